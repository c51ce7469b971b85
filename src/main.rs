//! clopts - parse a command line against option specs and print the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clopts::{tokenizer, CommandLine, ParseReport, ParserConfig};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Getopt-style option parsing from the shell.
#[derive(Parser, Debug)]
#[command(name = "clopts", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse arguments and print them in canonical form
    Parse {
        /// Short option spec, e.g. "t:fh"
        #[arg(long, default_value = "")]
        short: String,

        /// Long option spec, e.g. "test::,qed,data:"
        #[arg(long, default_value = "")]
        long: String,

        /// JSON parser configuration (replaces --short/--long)
        #[arg(long, conflicts_with_all = ["short", "long", "config_file"])]
        config: Option<String>,

        /// Path to a JSON parser configuration file
        #[arg(long, conflicts_with_all = ["short", "long"])]
        config_file: Option<String>,

        /// Accept any well-formed option
        #[arg(long)]
        accept_any: bool,

        /// Trace every parsing decision on stderr
        #[arg(long)]
        debug: bool,

        /// Print a JSON report instead of the canonical command line
        #[arg(long)]
        json: bool,

        /// Parse this string instead of the trailing arguments
        #[arg(long, allow_hyphen_values = true)]
        line: Option<String>,

        /// Arguments to parse
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Split a command string into tokens and print them as JSON
    Tokenize {
        /// The command string
        #[arg(allow_hyphen_values = true)]
        line: String,
    },
}

/// Parser tracing is gated by the parser's own debug toggle, so clopts events
/// pass the default filter whether debug came from the flag, the config or
/// `--SetCommandLineDebug`.
fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn,clopts=debug"
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .init();
}

fn build_parser(
    short: &str,
    long: &str,
    config: Option<&str>,
    config_file: Option<&str>,
    accept_any: bool,
) -> Result<CommandLine> {
    let cfg = match (config, config_file) {
        (Some(json), _) => ParserConfig::from_json(json).context("failed to parse config JSON")?,
        (None, Some(path)) => ParserConfig::from_file(path).context("failed to load config file")?,
        (None, None) => ParserConfig {
            short: short.to_string(),
            long: long.to_string(),
            ..ParserConfig::default()
        },
    };
    let cfg = ParserConfig {
        accept_any: cfg.accept_any || accept_any,
        ..cfg
    };
    cfg.validate().context("invalid config")?;
    cfg.build().context("invalid option spec")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            short,
            long,
            config,
            config_file,
            accept_any,
            debug,
            json,
            line,
            args,
        } => {
            init_tracing(debug);

            let mut cl = build_parser(
                &short,
                &long,
                config.as_deref(),
                config_file.as_deref(),
                accept_any,
            )?;
            if debug {
                cl.set_debug(true);
            }

            let parsed = match line {
                Some(line) => cl.parse_str(&line),
                None => cl.parse_args(&args),
            };
            parsed.context("failed to parse arguments")?;

            if json {
                println!("{}", ParseReport::new(&cl).to_json()?);
            } else {
                println!("{}", cl);
            }
        }
        Commands::Tokenize { line } => {
            let tokens = tokenizer::split(&line);
            println!("{}", serde_json::to_string(&tokens)?);
        }
    }

    Ok(())
}
