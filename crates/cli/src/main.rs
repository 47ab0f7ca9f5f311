//! config-resolver - Command-line access to ini and YAML configuration files.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Load the configuration named by the global options.
//! - Print option values as text or JSON.
//!
//! Does NOT handle:
//! - Parsing, lookup or secret semantics (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod commands;
mod config_context;
mod dispatch;
mod error;

use args::Cli;
use clap::Parser;
use config_context::{ConfigCommandContext, open_resolver};
use dispatch::run_command;
use error::{DotenvError, ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Returns true when `DOTENV_DISABLED` is set to `1` or `true`.
fn dotenv_disabled() -> bool {
    config_resolver::env_var_or_none("DOTENV_DISABLED")
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Load `.env` from the working directory; a missing file is not an error.
fn load_dotenv() -> Result<(), DotenvError> {
    if dotenv_disabled() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => Err(DotenvError::Parse { line: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(DotenvError::Io {
            kind: io_err.kind(),
        }),
        Err(_) => Err(DotenvError::Unknown),
    }
}

fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_context = if cli.command.needs_config() {
        match open_resolver(&cli) {
            Ok(resolver) => ConfigCommandContext::Real(Box::new(resolver)),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(e.exit_code().as_i32());
            }
        }
    } else {
        ConfigCommandContext::Placeholder
    };

    let exit_code = match run_command(cli, config_context) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
