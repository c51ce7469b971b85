//! Storage for parsed options and mass arguments.

use serde::Serialize;
use std::fmt;

/// The name of a short or long option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionName {
    /// A single-character option (e.g., 't' for -t)
    Short(char),
    /// A long option (e.g., "test" for --test)
    Long(String),
}

impl From<char> for OptionName {
    fn from(c: char) -> Self {
        OptionName::Short(c)
    }
}

impl From<&str> for OptionName {
    fn from(name: &str) -> Self {
        OptionName::Long(name.to_string())
    }
}

impl From<String> for OptionName {
    fn from(name: String) -> Self {
        OptionName::Long(name)
    }
}

impl From<&OptionName> for OptionName {
    fn from(name: &OptionName) -> Self {
        name.clone()
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionName::Short(c) => write!(f, "-{}", c),
            OptionName::Long(name) => write!(f, "--{}", name),
        }
    }
}

impl Serialize for OptionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One occurrence of a recognized option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedOption {
    /// Which option was given
    pub name: OptionName,
    /// The argument; `None` for options that take no argument
    pub value: Option<String>,
    /// `true` for a `-` introducer, `false` for `+`; always `true` for long options
    pub polarity: bool,
}

impl ParsedOption {
    /// The argument as a string, empty when the option carries none.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Parsed options in encounter order plus the mass arguments.
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    entries: Vec<ParsedOption>,
    mass: Vec<String>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, option: ParsedOption) {
        self.entries.push(option);
    }

    pub fn push_mass(&mut self, arg: String) {
        self.mass.push(arg);
    }

    /// Index of the earliest entry answering a query for `name`.
    ///
    /// A one-character long name with no long entries falls back to the
    /// short option of that character.
    fn position(&self, name: &OptionName) -> Option<usize> {
        if let Some(pos) = self.entries.iter().position(|e| &e.name == name) {
            return Some(pos);
        }
        match name {
            OptionName::Long(long) => {
                let mut chars = long.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let short = OptionName::Short(c);
                        self.entries.iter().position(|e| e.name == short)
                    }
                    _ => None,
                }
            }
            OptionName::Short(_) => None,
        }
    }

    /// The earliest entry for `name`, left in place.
    pub fn peek(&self, name: &OptionName) -> Option<&ParsedOption> {
        self.position(name).map(|pos| &self.entries[pos])
    }

    /// Remove and return the earliest entry for `name`.
    pub fn take(&mut self, name: &OptionName) -> Option<ParsedOption> {
        self.position(name).map(|pos| self.entries.remove(pos))
    }

    pub fn entries(&self) -> &[ParsedOption] {
        &self.entries
    }

    pub fn mass(&self) -> &[String] {
        &self.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(name: impl Into<OptionName>, value: Option<&str>) -> ParsedOption {
        ParsedOption {
            name: name.into(),
            value: value.map(str::to_string),
            polarity: true,
        }
    }

    #[test]
    fn test_take_is_fifo_per_name() {
        let mut store = OptionStore::new();
        store.push(opt('t', Some("1")));
        store.push(opt('q', None));
        store.push(opt('t', Some("2")));

        let t = OptionName::Short('t');
        assert_eq!(store.take(&t).unwrap().value(), "1");
        assert_eq!(store.take(&t).unwrap().value(), "2");
        assert!(store.take(&t).is_none());
        assert!(store.peek(&OptionName::Short('q')).is_some());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut store = OptionStore::new();
        store.push(opt("data", Some("5.6")));
        let data = OptionName::from("data");
        assert_eq!(store.peek(&data).unwrap().value(), "5.6");
        assert_eq!(store.peek(&data).unwrap().value(), "5.6");
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_one_char_long_query_falls_back_to_short() {
        let mut store = OptionStore::new();
        store.push(opt('b', Some("prima")));
        assert_eq!(store.peek(&OptionName::from("b")).unwrap().value(), "prima");
        // a short query never matches long entries
        store.push(opt("c", None));
        assert!(store.peek(&OptionName::Short('c')).is_none());
    }

    #[test]
    fn test_long_entry_preferred_over_short() {
        let mut store = OptionStore::new();
        store.push(opt('a', Some("1")));
        store.push(opt("a", Some("2")));
        assert_eq!(store.take(&OptionName::from("a")).unwrap().value(), "2");
        assert_eq!(store.take(&OptionName::from("a")).unwrap().value(), "1");
    }

    #[test]
    fn test_missing_value_reads_empty() {
        assert_eq!(opt("qed", None).value(), "");
    }

    #[test]
    fn test_name_display() {
        assert_eq!(OptionName::Short('x').to_string(), "-x");
        assert_eq!(OptionName::from("name").to_string(), "--name");
    }
}
