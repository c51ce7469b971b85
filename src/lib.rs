//! clopts - getopt-style command-line option parsing.
//!
//! This library parses a process argument vector or a free-form command
//! string against short (`-t1`, `-fh`, `+v`) and long (`--test=1`) option
//! specs, keeps every occurrence for oldest-first extraction, collects
//! positional "mass" arguments, and renders the result back into a
//! canonical command line.

pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod spec;
pub mod store;
pub mod tokenizer;

pub use config::{ConfigError, ParserConfig};
pub use error::OptionError;
pub use output::{render, ParseReport};
pub use parser::{CommandLine, DEBUG_OPTION};
pub use spec::{Arity, OptionTable, SpecError};
pub use store::{OptionName, ParsedOption};
