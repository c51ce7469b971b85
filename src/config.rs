//! JSON configuration for building a [`CommandLine`].

use crate::error::OptionError;
use crate::parser::CommandLine;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a parser configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'accept_any' cannot be combined with option specs")]
    AcceptAnyWithSpecs,
}

/// Which options a parser accepts.
///
/// ```json
/// { "short": "t:fh", "long": "test::,qed,data:", "debug": false }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Short option spec (e.g., "t:fh")
    #[serde(default)]
    pub short: String,
    /// Long option spec (e.g., "test:,qed")
    #[serde(default)]
    pub long: String,
    /// Trace parsing decisions
    #[serde(default)]
    pub debug: bool,
    /// Accept any well-formed option instead of declared ones
    #[serde(default)]
    pub accept_any: bool,
}

impl ParserConfig {
    /// Parse a JSON string into a ParserConfig.
    pub fn from_json(json: &str) -> Result<ParserConfig, ConfigError> {
        let config: ParserConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ParserConfig, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accept_any && !(self.short.is_empty() && self.long.is_empty()) {
            return Err(ConfigError::AcceptAnyWithSpecs);
        }
        Ok(())
    }

    /// Build a parser with the configured specs and debug setting.
    ///
    /// Spec errors surface here, before anything is parsed.
    pub fn build(&self) -> Result<CommandLine, OptionError> {
        let mut cl = if self.accept_any {
            CommandLine::accept_any()
        } else {
            CommandLine::with_specs(&self.short, &self.long)?
        };
        cl.set_debug(self.debug);
        Ok(cl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "short": "t:fh",
            "long": "test::,qed",
            "debug": true
        }"#;

        let config = ParserConfig::from_json(json).unwrap();
        assert_eq!(config.short, "t:fh");
        assert_eq!(config.long, "test::,qed");
        assert!(config.debug);
        assert!(!config.accept_any);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ParserConfig::from_json("{}").unwrap();
        assert!(config.short.is_empty());
        assert!(config.long.is_empty());
        assert!(!config.debug);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ParserConfig::from_json(r#"{"shrot":"t"}"#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(ParserConfig::from_json("{").is_err());
    }

    #[test]
    fn test_accept_any_with_specs_invalid() {
        let config = ParserConfig::from_json(r#"{"short":"t","accept_any":true}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AcceptAnyWithSpecs)
        ));
    }

    #[test]
    fn test_build_parser() {
        let config = ParserConfig::from_json(r#"{"short":"t:","long":"data:","debug":true}"#)
            .unwrap();
        let mut cl = config.build().unwrap();
        assert!(cl.debug());
        assert_eq!(cl.short_spec(), "t:");
        cl.parse_str("-t1 --data=x").unwrap();
        assert_eq!(cl.value('t'), Some("1"));
    }

    #[test]
    fn test_build_accept_any() {
        let config = ParserConfig::from_json(r#"{"accept_any":true}"#).unwrap();
        let mut cl = config.build().unwrap();
        cl.parse_str("--anything=goes").unwrap();
        assert_eq!(cl.value("anything"), Some("goes"));
    }

    #[test]
    fn test_build_reports_spec_error() {
        let config = ParserConfig::from_json(r#"{"long":"a,,b"}"#).unwrap();
        assert!(matches!(config.build(), Err(OptionError::Spec(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"short":"ab:c","long":"aap"}}"#).unwrap();
        let config = ParserConfig::from_file(file.path()).unwrap();
        assert_eq!(config.short, "ab:c");
        assert_eq!(config.long, "aap");
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParserConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
