//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `config_context`).
//!
//! Invariants:
//! - Commands are routed based on the top-level Commands enum variant.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::config_context::ConfigCommandContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli, config: ConfigCommandContext) -> Result<()> {
    let output = cli.output;
    match cli.command {
        Commands::Get {
            name,
            section,
            default,
        } => {
            let resolver = config.into_resolver()?;
            commands::lookup::run_get(&resolver, &name, section.as_deref(), default, output)?;
        }
        Commands::Path {
            name,
            section,
            prefix,
            prefix_section,
        } => {
            let resolver = config.into_resolver()?;
            commands::lookup::run_path(
                &resolver,
                &name,
                section.as_deref(),
                prefix.as_deref(),
                prefix_section.as_deref(),
                output,
            )?;
        }
        Commands::Env { name, section } => {
            let resolver = config.into_resolver()?;
            commands::lookup::run_env(&resolver, &name, section.as_deref(), output)?;
        }
        Commands::List {
            name,
            section,
            delimiter,
        } => {
            let resolver = config.into_resolver()?;
            commands::lookup::run_list(&resolver, &name, section.as_deref(), &delimiter, output)?;
        }
        Commands::Secret { name, section } => {
            let resolver = config.into_resolver()?;
            commands::secret::run_secret(&resolver, &name, section.as_deref(), output)?;
        }
        Commands::Sections => {
            let resolver = config.into_resolver()?;
            commands::lookup::run_sections(&resolver, output)?;
        }
        Commands::Export { to, output_file } => {
            let resolver = config.into_resolver()?;
            commands::export::run(&resolver, to.as_deref(), output_file.as_deref())?;
        }
        Commands::Encrypt { key_env } => {
            commands::secret::run_encrypt(&key_env, std::io::stdin().lock(), output)?;
        }
        Commands::Keygen => {
            commands::secret::run_keygen(output)?;
        }
    }
    Ok(())
}
