//! The option error category shared by registration, parsing and queries.

use crate::spec::SpecError;
use thiserror::Error;

/// Any failure reported by [`CommandLine`](crate::CommandLine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("invalid option spec: {0}")]
    Spec(#[from] SpecError),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("missing argument for option: {0}")]
    MissingArgument(String),

    #[error("cannot convert value '{value}' of option {option} to {target}: {reason}")]
    Conversion {
        option: String,
        value: String,
        target: &'static str,
        reason: String,
    },
}
