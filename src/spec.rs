//! Option specification grammars and the compiled option table.
//!
//! Two small grammars declare which options exist:
//!
//! - short: `"t:fh"`, one character per option, each optionally followed by
//!   `:` (argument required) or `::` (argument optional). Commas between
//!   entries are ignored, so `"t::,f:"` is the same as `"t::f:"`.
//! - long: `"test:,qed,data::"`, comma-separated names with the same colon
//!   suffixes.

use std::fmt;
use thiserror::Error;

/// Errors raised while compiling a short or long option spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("too many colons after '{0}' in option spec")]
    TooManyColons(String),

    #[error("colon without an option name in short spec '{0}'")]
    DanglingColon(String),

    #[error("empty option name in long spec '{0}'")]
    EmptyName(String),

    #[error("invalid short option '{0}': must be a single ASCII letter or digit")]
    InvalidShortName(char),

    #[error("invalid long option name '{0}'")]
    InvalidLongName(String),

    #[error("option '{0}' declared twice with different arguments")]
    ConflictingArity(String),
}

/// Whether an option takes an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A plain flag (e.g., -h)
    None,
    /// Argument required (e.g., -o file, --output=file)
    Required,
    /// Argument optional (e.g., -t, -t3, --test=3)
    Optional,
}

impl Arity {
    fn from_colons(colons: usize, name: &str) -> Result<Arity, SpecError> {
        match colons {
            0 => Ok(Arity::None),
            1 => Ok(Arity::Required),
            2 => Ok(Arity::Optional),
            _ => Err(SpecError::TooManyColons(name.to_string())),
        }
    }

    /// The colon suffix used for this arity in a spec string.
    pub fn suffix(self) -> &'static str {
        match self {
            Arity::None => "",
            Arity::Required => ":",
            Arity::Optional => "::",
        }
    }

    /// True when the option can carry a value.
    pub fn takes_value(self) -> bool {
        self != Arity::None
    }
}

/// Check whether `c` may be used as a short option character.
pub fn is_short_name(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Check whether `name` may be used as a long option name.
pub fn is_long_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        _ => false,
    }
}

/// Compile a short option spec into `(char, arity)` pairs in declaration order.
pub fn compile_short(spec: &str) -> Result<Vec<(char, Arity)>, SpecError> {
    let chars: Vec<char> = spec.chars().collect();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;

        if c == ',' {
            continue;
        }
        if c == ':' {
            return Err(SpecError::DanglingColon(spec.to_string()));
        }
        if !is_short_name(c) {
            return Err(SpecError::InvalidShortName(c));
        }

        let mut colons = 0;
        while i < chars.len() && chars[i] == ':' {
            colons += 1;
            i += 1;
        }
        entries.push((c, Arity::from_colons(colons, &c.to_string())?));
    }

    Ok(entries)
}

/// Compile a long option spec into `(name, arity)` pairs in declaration order.
pub fn compile_long(spec: &str) -> Result<Vec<(String, Arity)>, SpecError> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for item in spec.split(',') {
        let name = item.trim_end_matches(':');
        let colons = item.len() - name.len();

        if name.is_empty() {
            return Err(SpecError::EmptyName(spec.to_string()));
        }
        if !is_long_name(name) {
            return Err(SpecError::InvalidLongName(name.to_string()));
        }
        entries.push((name.to_string(), Arity::from_colons(colons, name)?));
    }

    Ok(entries)
}

/// The compiled tables of recognized short and long options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    short: Vec<(char, Arity)>,
    long: Vec<(String, Arity)>,
}

impl OptionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a short spec and merge it into the table.
    ///
    /// The table is left untouched when the spec fails to compile or
    /// conflicts with an earlier declaration.
    pub fn add_short(&mut self, spec: &str) -> Result<(), SpecError> {
        let entries = compile_short(spec)?;
        let mut merged = self.short.clone();
        for (c, arity) in entries {
            merge(&mut merged, c, arity, |c| c.to_string())?;
        }
        self.short = merged;
        Ok(())
    }

    /// Compile a long spec and merge it into the table.
    pub fn add_long(&mut self, spec: &str) -> Result<(), SpecError> {
        let entries = compile_long(spec)?;
        let mut merged = self.long.clone();
        for (name, arity) in entries {
            merge(&mut merged, name, arity, |n| n.clone())?;
        }
        self.long = merged;
        Ok(())
    }

    /// Look up the arity of a short option.
    pub fn short(&self, c: char) -> Option<Arity> {
        self.short
            .iter()
            .find(|(name, _)| *name == c)
            .map(|(_, arity)| *arity)
    }

    /// Look up the arity of a long option.
    pub fn long(&self, name: &str) -> Option<Arity> {
        self.long
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, arity)| *arity)
    }

    /// True when no option of either kind has been declared.
    pub fn is_empty(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }

    /// Render the short table back into canonical spec form.
    pub fn short_spec(&self) -> String {
        self.short
            .iter()
            .map(|(c, arity)| format!("{}{}", c, arity.suffix()))
            .collect()
    }

    /// Render the long table back into canonical spec form.
    pub fn long_spec(&self) -> String {
        self.long
            .iter()
            .map(|(name, arity)| format!("{}{}", name, arity.suffix()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn merge<K: PartialEq>(
    table: &mut Vec<(K, Arity)>,
    key: K,
    arity: Arity,
    describe: impl Fn(&K) -> String,
) -> Result<(), SpecError> {
    if let Some((_, existing)) = table.iter().find(|(k, _)| *k == key) {
        if *existing != arity {
            return Err(SpecError::ConflictingArity(describe(&key)));
        }
        return Ok(());
    }
    table.push((key, arity));
    Ok(())
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Arity::None => "no argument",
            Arity::Required => "required argument",
            Arity::Optional => "optional argument",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_short_arities() {
        let entries = compile_short("t:fh::").unwrap();
        assert_eq!(
            entries,
            vec![('t', Arity::Required), ('f', Arity::None), ('h', Arity::Optional)]
        );
    }

    #[test]
    fn test_compile_short_ignores_commas() {
        assert_eq!(compile_short("t::,f:").unwrap(), compile_short("t::f:").unwrap());
    }

    #[test]
    fn test_compile_short_too_many_colons() {
        assert_eq!(
            compile_short("t:::"),
            Err(SpecError::TooManyColons("t".to_string()))
        );
    }

    #[test]
    fn test_compile_short_leading_colon() {
        assert!(matches!(compile_short(":t"), Err(SpecError::DanglingColon(_))));
    }

    #[test]
    fn test_compile_short_invalid_char() {
        assert_eq!(compile_short("a-"), Err(SpecError::InvalidShortName('-')));
    }

    #[test]
    fn test_compile_long_arities() {
        let entries = compile_long("test::,qed,data:").unwrap();
        assert_eq!(
            entries,
            vec![
                ("test".to_string(), Arity::Optional),
                ("qed".to_string(), Arity::None),
                ("data".to_string(), Arity::Required),
            ]
        );
    }

    #[test]
    fn test_compile_long_empty_spec() {
        assert!(compile_long("").unwrap().is_empty());
    }

    #[test]
    fn test_compile_long_empty_name() {
        assert!(matches!(compile_long("a,,b"), Err(SpecError::EmptyName(_))));
        assert!(matches!(compile_long("a,"), Err(SpecError::EmptyName(_))));
        assert!(matches!(compile_long("::"), Err(SpecError::EmptyName(_))));
    }

    #[test]
    fn test_compile_long_too_many_colons() {
        assert_eq!(
            compile_long("data:::"),
            Err(SpecError::TooManyColons("data".to_string()))
        );
    }

    #[test]
    fn test_compile_long_invalid_name() {
        assert!(matches!(compile_long("-x"), Err(SpecError::InvalidLongName(_))));
        assert!(matches!(compile_long("a b"), Err(SpecError::InvalidLongName(_))));
        assert!(matches!(compile_long("a=b"), Err(SpecError::InvalidLongName(_))));
    }

    #[test]
    fn test_long_name_grammar() {
        assert!(is_long_name("dry-run"));
        assert!(is_long_name("SetCommandLineDebug"));
        assert!(is_long_name("v2.x_y"));
        assert!(!is_long_name(""));
        assert!(!is_long_name("_x"));
    }

    #[test]
    fn test_table_lookup() {
        let mut table = OptionTable::new();
        table.add_short("a:").unwrap();
        table.add_long("a").unwrap();
        assert_eq!(table.short('a'), Some(Arity::Required));
        assert_eq!(table.long("a"), Some(Arity::None));
        assert_eq!(table.short('b'), None);
        assert_eq!(table.long("b"), None);
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let mut table = OptionTable::new();
        assert_eq!(
            table.add_short("t:t"),
            Err(SpecError::ConflictingArity("t".to_string()))
        );
        assert!(table.is_empty());

        table.add_long("test:").unwrap();
        assert_eq!(
            table.add_long("qed,test::"),
            Err(SpecError::ConflictingArity("test".to_string()))
        );
        // failed registration leaves the table as it was
        assert_eq!(table.long("qed"), None);
    }

    #[test]
    fn test_same_duplicate_accepted() {
        let mut table = OptionTable::new();
        table.add_short("t:").unwrap();
        table.add_short("t:f").unwrap();
        assert_eq!(table.short_spec(), "t:f");
    }

    #[test]
    fn test_spec_round_trip() {
        for (short, long) in [
            ("t:fh", "test:,qed,data::"),
            ("", "false:,true::"),
            ("f:t::", ""),
            ("ab:c", "aap"),
        ] {
            let mut table = OptionTable::new();
            table.add_short(short).unwrap();
            table.add_long(long).unwrap();
            assert_eq!(table.short_spec(), short);
            assert_eq!(table.long_spec(), long);
        }
    }
}
