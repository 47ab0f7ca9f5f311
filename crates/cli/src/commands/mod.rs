//! CLI command implementations.

pub mod export;
pub mod lookup;
pub mod secret;

use serde::Serialize;

use crate::args::OutputFormat;

/// JSON payload for single-option commands.
#[derive(Debug, Serialize)]
pub(crate) struct OptionOutput<'a, T: Serialize> {
    pub section: &'a str,
    pub name: &'a str,
    pub value: T,
}

/// Print `text` or the JSON form of `json`, depending on `output`.
pub(crate) fn emit<T: Serialize>(output: OutputFormat, text: &str, json: &T) -> anyhow::Result<()> {
    match output {
        OutputFormat::Text => println!("{text}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(json)?),
    }
    Ok(())
}
