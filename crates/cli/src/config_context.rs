//! Configuration context for command execution.
//!
//! Responsibilities:
//! - Build a `ConfigResolver` from the global CLI options.
//! - Distinguish commands that need a loaded configuration from those that do not.
//!
//! Does NOT handle:
//! - CLI argument definitions (see `args` module).
//! - Option lookup semantics (see the `config-resolver` crate).
//!
//! Invariants:
//! - An explicit `--config-path` wins over `CONFIG_RESOLVER_PATH`; with neither, `setup.cfg`.
//! - Placeholder contexts are never used for lookups.

use anyhow::{Context, Result};
use config_resolver::{ConfigFormat, ConfigResolver};

use crate::args::{CONFIG_PATH_ENV, Cli};

/// Context for command execution.
pub(crate) enum ConfigCommandContext {
    /// A loaded configuration.
    Real(Box<ConfigResolver>),
    /// Used for commands that never read a configuration file.
    Placeholder,
}

impl ConfigCommandContext {
    /// Extract the resolver, failing if this is a placeholder.
    pub(crate) fn into_resolver(self) -> Result<ConfigResolver> {
        match self {
            ConfigCommandContext::Real(resolver) => Ok(*resolver),
            ConfigCommandContext::Placeholder => {
                anyhow::bail!(
                    "Internal error: attempted to use placeholder context for an operation requiring a configuration file"
                )
            }
        }
    }
}

/// Parse a `--format` / `--to` value.
pub(crate) fn parse_format(value: &str) -> Result<ConfigFormat> {
    value
        .parse::<ConfigFormat>()
        .with_context(|| format!("Invalid format '{value}'"))
}

/// Load the configuration named by the global options.
pub(crate) fn open_resolver(cli: &Cli) -> Result<ConfigResolver> {
    let mut builder = ConfigResolver::builder()
        .with_fallback_env(CONFIG_PATH_ENV)
        .with_import_environment(cli.import_environment)
        .with_use_cache(cli.use_cache)
        .with_env_substitution(!cli.no_env_substitution);

    // Blank values fall back to the environment variable / setup.cfg.
    if let Some(path) = cli.config_path.as_deref().filter(|p| !p.trim().is_empty()) {
        builder = builder.with_config_path(path.trim());
    }
    if let Some(format) = cli.format.as_deref() {
        builder = builder.with_format(parse_format(format)?);
    }
    if let Some(path) = cli.mock_top_path.clone() {
        builder = builder.with_mock_top_path(path);
    }
    if let Some(section) = cli.default_section.clone() {
        builder = builder.with_default_section(section);
    }
    if let Some(dir) = cli.cache_dir.clone() {
        builder = builder.with_cache_dir(dir);
    }

    let locator = builder
        .resolved_source()
        .map(|s| s.to_string())
        .unwrap_or_default();
    let resolver = builder
        .load()
        .with_context(|| format!("Failed to load configuration from {locator}"))?;
    tracing::debug!(
        source = %locator,
        format = %resolver.format(),
        sections = resolver.store().sections().len(),
        "Configuration loaded"
    );
    Ok(resolver)
}
