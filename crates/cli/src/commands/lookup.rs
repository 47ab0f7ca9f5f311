//! Option lookup commands: get, path, env, list and sections.

use anyhow::{Context, Result};
use config_resolver::{ConfigResolver, ConfigValue};

use super::{OptionOutput, emit};
use crate::args::OutputFormat;

fn section_label<'a>(resolver: &'a ConfigResolver, section: Option<&'a str>) -> &'a str {
    section.unwrap_or(resolver.default_section_name())
}

pub fn run_get(
    resolver: &ConfigResolver,
    name: &str,
    section: Option<&str>,
    default: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let value = match default {
        Some(default) => resolver.get_option_or(name, section, default),
        None => resolver.get_option(name, section),
    }
    .with_context(|| format!("Failed to read option '{name}'"))?;

    let text = match &value {
        ConfigValue::Map(_) => serde_json::to_string_pretty(&value)?,
        other => other.to_string(),
    };
    emit(
        output,
        &text,
        &OptionOutput {
            section: section_label(resolver, section),
            name,
            value: &value,
        },
    )
}

pub fn run_path(
    resolver: &ConfigResolver,
    name: &str,
    section: Option<&str>,
    prefix: Option<&str>,
    prefix_section: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let path = resolver
        .get_path_with_prefix(name, section, prefix, prefix_section)
        .with_context(|| format!("Failed to resolve path option '{name}'"))?;
    let text = path.display().to_string();
    emit(
        output,
        &text,
        &OptionOutput {
            section: section_label(resolver, section),
            name,
            value: &text,
        },
    )
}

pub fn run_env(
    resolver: &ConfigResolver,
    name: &str,
    section: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let value = resolver
        .get_env_value(name, section)
        .with_context(|| format!("Failed to read environment option '{name}'"))?;
    emit(
        output,
        &value,
        &OptionOutput {
            section: section_label(resolver, section),
            name,
            value: &value,
        },
    )
}

pub fn run_list(
    resolver: &ConfigResolver,
    name: &str,
    section: Option<&str>,
    delimiter: &str,
    output: OutputFormat,
) -> Result<()> {
    let items = resolver
        .get_list_with_delimiter(name, section, delimiter)
        .with_context(|| format!("Failed to read list option '{name}'"))?;
    emit(
        output,
        &items.join("\n"),
        &OptionOutput {
            section: section_label(resolver, section),
            name,
            value: &items,
        },
    )
}

pub fn run_sections(resolver: &ConfigResolver, output: OutputFormat) -> Result<()> {
    let names: Vec<&str> = resolver.store().section_names().collect();
    emit(output, &names.join("\n"), &names)
}
