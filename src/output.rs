//! Rendering parsed options back into a command line or a JSON report.

use crate::parser::{looks_like_option, CommandLine};
use crate::store::{OptionName, ParsedOption};
use serde::Serialize;
use std::fmt;

/// Quote a token so that [`tokenizer::split`](crate::tokenizer::split) reads it back unchanged.
///
/// Tokens that are empty or contain whitespace, `"` or `\` are wrapped in
/// double quotes, with `"` and `\` escaped by a backslash.
pub fn quote_token(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quotes {
        return token.to_string();
    }

    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('"');
    for c in token.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Render one option occurrence in canonical form.
///
/// Long options always attach their value with `=`. A short option's value
/// is a separate word, unless it would itself read as an option, in which
/// case it is attached (`-d-x`).
pub fn render_option(option: &ParsedOption) -> String {
    match (&option.name, &option.value) {
        (OptionName::Short(c), value) => {
            let introducer = if option.polarity { '-' } else { '+' };
            match value {
                None => format!("{}{}", introducer, c),
                Some(v) if looks_like_option(v) => {
                    format!("{}{}{}", introducer, c, quote_token(v))
                }
                Some(v) => format!("{}{} {}", introducer, c, quote_token(v)),
            }
        }
        (OptionName::Long(name), None) => format!("--{}", name),
        (OptionName::Long(name), Some(v)) if v.is_empty() => format!("--{}=", name),
        (OptionName::Long(name), Some(v)) => format!("--{}={}", name, quote_token(v)),
    }
}

/// Render every held option followed by the mass arguments.
///
/// A `--` is inserted before the mass arguments when one of them would
/// otherwise read as an option.
pub fn render(options: &[ParsedOption], mass: &[String]) -> String {
    let mut words: Vec<String> = options.iter().map(render_option).collect();

    if mass.iter().any(|arg| looks_like_option(arg)) {
        words.push("--".to_string());
    }
    words.extend(mass.iter().map(|arg| quote_token(arg)));

    words.join(" ")
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self.options(), self.mass_args()))
    }
}

/// Serializable snapshot of a parsed command line.
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub options: &'a [ParsedOption],
    pub mass: &'a [String],
}

impl<'a> ParseReport<'a> {
    pub fn new(cl: &'a CommandLine) -> Self {
        Self {
            options: cl.options(),
            mass: cl.mass_args(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
