//! Command-line parsing against a compiled option table.

use crate::error::OptionError;
use crate::spec::{is_long_name, is_short_name, Arity, OptionTable};
use crate::store::{OptionName, OptionStore, ParsedOption};
use crate::tokenizer;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Undeclared long option that switches on debug tracing instead of being stored.
pub const DEBUG_OPTION: &str = "SetCommandLineDebug";

type Tokens<'t> = std::iter::Peekable<std::slice::Iter<'t, String>>;

/// How a single token is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// A bare `--`
    EndOfOptions,
    /// `--name` or `--name=value`
    Long {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// `-abc` or `+abc`; `cluster` is everything after the introducer
    Short { polarity: bool, cluster: &'a str },
    /// Anything else
    Mass,
}

pub(crate) fn classify(token: &str) -> TokenKind<'_> {
    if token == "--" {
        return TokenKind::EndOfOptions;
    }

    if let Some(body) = token.strip_prefix("--") {
        // Only the first '=' separates; the value may contain more
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        return if is_long_name(name) {
            TokenKind::Long { name, value }
        } else {
            TokenKind::Mass
        };
    }

    let polarity = match token.chars().next() {
        Some('-') => true,
        Some('+') => false,
        _ => return TokenKind::Mass,
    };
    let cluster = &token[1..];
    match cluster.chars().next() {
        Some(c) if is_short_name(c) => TokenKind::Short { polarity, cluster },
        _ => TokenKind::Mass,
    }
}

/// True when the parser would read `token` as an option rather than a value.
pub(crate) fn looks_like_option(token: &str) -> bool {
    classify(token) != TokenKind::Mass
}

/// Consume the next token as a value unless it is itself an option.
fn next_value(tokens: &mut Tokens<'_>) -> Option<String> {
    tokens.next_if(|next| !looks_like_option(next)).cloned()
}

/// A command-line parser together with everything it has parsed.
///
/// Options are declared with short and long spec strings (see
/// [`crate::spec`]), then one or more `parse_*` calls fill the store. Named
/// options are drained oldest-first with [`extract`](Self::extract); mass
/// arguments stay available.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    table: OptionTable,
    short_spec: String,
    long_spec: String,
    store: OptionStore,
    accept_any: bool,
    debug: bool,
}

impl CommandLine {
    /// Create a parser with no declared options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from a short and a long spec. Either may be empty.
    pub fn with_specs(short: &str, long: &str) -> Result<Self, OptionError> {
        let mut parser = Self::new();
        parser.allow(short, long)?;
        Ok(parser)
    }

    /// Create a parser that accepts any well-formed option.
    ///
    /// Every short character and long name is treated as taking an optional
    /// argument, so `-dfiets` is `-d` with value `fiets` and `--appel peer`
    /// is `--appel` with value `peer`.
    pub fn accept_any() -> Self {
        Self {
            accept_any: true,
            ..Self::default()
        }
    }

    /// Declare short and long options in one call.
    ///
    /// Nothing is registered unless both specs compile.
    pub fn allow(&mut self, short: &str, long: &str) -> Result<(), OptionError> {
        let mut table = self.table.clone();
        table.add_short(short)?;
        table.add_long(long)?;
        self.table = table;
        self.record_short_spec(short);
        self.record_long_spec(long);
        Ok(())
    }

    /// Declare short options, e.g. `"t:fh"`.
    pub fn allow_short(&mut self, spec: &str) -> Result<(), OptionError> {
        self.table.add_short(spec)?;
        self.record_short_spec(spec);
        Ok(())
    }

    /// Declare long options, e.g. `"test:,qed,data::"`.
    pub fn allow_long(&mut self, spec: &str) -> Result<(), OptionError> {
        self.table.add_long(spec)?;
        self.record_long_spec(spec);
        Ok(())
    }

    fn record_short_spec(&mut self, spec: &str) {
        self.short_spec.push_str(spec);
    }

    fn record_long_spec(&mut self, spec: &str) {
        if !self.long_spec.is_empty() && !spec.is_empty() {
            self.long_spec.push(',');
        }
        self.long_spec.push_str(spec);
    }

    /// The short specs as registered.
    pub fn short_spec(&self) -> &str {
        &self.short_spec
    }

    /// The long specs as registered, joined with commas.
    pub fn long_spec(&self) -> &str {
        &self.long_spec
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn accepts_any(&self) -> bool {
        self.accept_any
    }

    /// Trace each parsing decision at debug level.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Parse a process argument vector; slot 0 is the program name and is skipped.
    pub fn parse_argv<I, S>(&mut self, argv: I) -> Result<(), OptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokenizer::from_argv(argv.into_iter().skip(1));
        self.parse_tokens(&tokens)
    }

    /// Parse already-split arguments, none of which is a program name.
    pub fn parse_args<I, S>(&mut self, args: I) -> Result<(), OptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokenizer::from_argv(args);
        self.parse_tokens(&tokens)
    }

    /// Parse a free-form command string such as `-t1 -d"a b" file`.
    pub fn parse_str(&mut self, line: &str) -> Result<(), OptionError> {
        let tokens = tokenizer::split(line);
        self.parse_tokens(&tokens)
    }

    /// Parse the arguments of the running process.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily: each invalid
    /// sequence becomes U+FFFD. Use [`parse_argv`](Self::parse_argv) with
    /// checked conversions to reject them instead.
    pub fn parse_env(&mut self) -> Result<(), OptionError> {
        let argv: Vec<String> = std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.parse_argv(argv)
    }

    /// Parse a token sequence into the store.
    ///
    /// Stops at the first error. Entries stored for earlier tokens are kept.
    fn parse_tokens(&mut self, tokens: &[String]) -> Result<(), OptionError> {
        let mut tokens = tokens.iter().peekable();
        let mut parsing_options = true;

        while let Some(token) = tokens.next() {
            if !parsing_options {
                self.step(token, format_args!("mass argument after --"));
                self.store.push_mass(token.clone());
                continue;
            }

            match classify(token) {
                TokenKind::EndOfOptions => {
                    self.step(token, format_args!("end of options"));
                    parsing_options = false;
                }
                TokenKind::Long { name, value } => {
                    self.parse_long_option(token, name, value, &mut tokens)?;
                }
                TokenKind::Short { polarity, cluster } => {
                    self.parse_short_options(token, polarity, cluster, &mut tokens)?;
                }
                TokenKind::Mass => {
                    self.step(token, format_args!("mass argument"));
                    self.store.push_mass(token.clone());
                }
            }
        }

        Ok(())
    }

    fn parse_long_option(
        &mut self,
        token: &str,
        name: &str,
        inline_value: Option<&str>,
        tokens: &mut Tokens<'_>,
    ) -> Result<(), OptionError> {
        let arity = match self.table.long(name) {
            Some(arity) => arity,
            None if name == DEBUG_OPTION => {
                self.debug = true;
                self.step(token, format_args!("debug switched on"));
                return Ok(());
            }
            None if self.accept_any => Arity::Optional,
            None => return Err(OptionError::UnknownOption(format!("--{}", name))),
        };

        let value = match (arity, inline_value) {
            // A value attached to a plain flag is dropped
            (Arity::None, _) => None,
            (_, Some(v)) => Some(v.to_string()),
            (Arity::Required, None) => {
                // Taken unconditionally, even "" or "-x"
                let next = tokens
                    .next()
                    .ok_or_else(|| OptionError::MissingArgument(format!("--{}", name)))?;
                Some(next.clone())
            }
            (Arity::Optional, None) => Some(next_value(tokens).unwrap_or_default()),
        };

        self.step(
            token,
            format_args!("long option --{} ({}), value {:?}", name, arity, value),
        );
        self.store.push(ParsedOption {
            name: OptionName::Long(name.to_string()),
            value,
            polarity: true,
        });
        Ok(())
    }

    /// Parse one `-abc`/`+abc` token.
    ///
    /// Entries are stored only once the whole cluster resolves, so a rejected
    /// token leaves nothing behind.
    fn parse_short_options(
        &mut self,
        token: &str,
        polarity: bool,
        cluster: &str,
        tokens: &mut Tokens<'_>,
    ) -> Result<(), OptionError> {
        let introducer = if polarity { '-' } else { '+' };
        let mut parsed = Vec::new();

        for (i, c) in cluster.char_indices() {
            let arity = match self.table.short(c) {
                Some(arity) => arity,
                None if self.accept_any && is_short_name(c) => Arity::Optional,
                None => {
                    return Err(OptionError::UnknownOption(format!("{}{}", introducer, c)));
                }
            };

            if !arity.takes_value() {
                self.step(token, format_args!("short option {}{}", introducer, c));
                parsed.push(ParsedOption {
                    name: OptionName::Short(c),
                    value: None,
                    polarity,
                });
                continue;
            }

            // The rest of the token is the value; no more bundled flags after it
            let remaining = &cluster[i + c.len_utf8()..];
            let value = if !remaining.is_empty() {
                remaining.to_string()
            } else {
                match (arity, next_value(tokens)) {
                    (_, Some(next)) => next,
                    (Arity::Required, None) => {
                        return Err(OptionError::MissingArgument(format!("{}{}", introducer, c)));
                    }
                    _ => String::new(),
                }
            };

            self.step(
                token,
                format_args!("short option {}{} ({}), value {:?}", introducer, c, arity, value),
            );
            parsed.push(ParsedOption {
                name: OptionName::Short(c),
                value: Some(value),
                polarity,
            });
            break;
        }

        for option in parsed {
            self.store.push(option);
        }
        Ok(())
    }

    fn step(&self, token: &str, decision: fmt::Arguments<'_>) {
        if self.debug {
            tracing::debug!(token, "{}", decision);
        }
    }

    /// True if at least one unconsumed occurrence of `name` exists.
    pub fn is_present(&self, name: impl Into<OptionName>) -> bool {
        self.peek(name).is_some()
    }

    /// The earliest unconsumed occurrence of `name`, left in place.
    pub fn peek(&self, name: impl Into<OptionName>) -> Option<&ParsedOption> {
        self.store.peek(&name.into())
    }

    /// The value of the earliest unconsumed occurrence of `name`.
    pub fn value(&self, name: impl Into<OptionName>) -> Option<&str> {
        self.peek(name).map(ParsedOption::value)
    }

    /// Like [`value`](Self::value), converted to `T`.
    ///
    /// `Ok(None)` when the option is absent; a conversion error when it is
    /// present but does not parse as `T`.
    pub fn value_as<T>(&self, name: impl Into<OptionName>) -> Result<Option<T>, OptionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.peek(name).map(convert).transpose()
    }

    /// Remove and return the earliest unconsumed occurrence of `name`.
    ///
    /// Returns `None` once every occurrence is consumed, so
    /// `while let Some(opt) = cl.extract('t')` drains in input order.
    pub fn extract(&mut self, name: impl Into<OptionName>) -> Option<ParsedOption> {
        self.store.take(&name.into())
    }

    /// Remove the earliest occurrence of `name` and return its value.
    pub fn extract_value(&mut self, name: impl Into<OptionName>) -> Option<String> {
        self.extract(name)
            .map(|option| option.value.unwrap_or_default())
    }

    /// Remove the earliest occurrence of `name` and convert its value.
    ///
    /// The occurrence is consumed even when the conversion fails.
    pub fn extract_as<T>(&mut self, name: impl Into<OptionName>) -> Result<Option<T>, OptionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.extract(name).as_ref().map(convert).transpose()
    }

    /// Positional arguments in input order. Reading them does not consume them.
    pub fn mass_args(&self) -> &[String] {
        self.store.mass()
    }

    /// All unconsumed options in encounter order.
    pub fn options(&self) -> &[ParsedOption] {
        self.store.entries()
    }
}

fn convert<T>(option: &ParsedOption) -> Result<T, OptionError>
where
    T: FromStr,
    T::Err: Display,
{
    option
        .value()
        .parse::<T>()
        .map_err(|e| OptionError::Conversion {
            option: option.name.to_string(),
            value: option.value().to_string(),
            target: std::any::type_name::<T>(),
            reason: e.to_string(),
        })
}
