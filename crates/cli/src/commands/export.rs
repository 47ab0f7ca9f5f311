//! Export command: convert the loaded configuration to another format.

use anyhow::{Context, Result};
use config_resolver::ConfigResolver;
use std::path::Path;

use crate::config_context::parse_format;

pub fn run(resolver: &ConfigResolver, to: Option<&str>, output_file: Option<&Path>) -> Result<()> {
    let format = match to {
        Some(to) => parse_format(to)?,
        None => resolver.format().other(),
    };

    match output_file {
        Some(path) => {
            resolver
                .write_config(path, Some(format))
                .with_context(|| format!("Failed to export configuration to {}", path.display()))?;
            eprintln!("Wrote {format} configuration to {}", path.display());
        }
        None => {
            let text = resolver
                .export_config(format)
                .context("Failed to export configuration")?;
            print!("{text}");
        }
    }
    Ok(())
}
