//! YAML codec.
//!
//! The document must be a mapping of section names to option mappings.

use super::ConfigFormat;
use crate::error::{ConfigError, Result};
use crate::store::{Section, Sections};
use crate::value::{ConfigValue, yaml_key_to_string};

const DOCUMENT_START: &str = "---\n";

pub(crate) fn parse(text: &str, origin: &str) -> Result<Sections> {
    if is_blank_document(text) {
        return Ok(Sections::new());
    }
    let doc: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| ConfigError::parse(origin, ConfigFormat::Yaml, e.to_string()))?;

    let mapping = match doc {
        serde_yaml::Value::Null => return Ok(Sections::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => {
            return Err(ConfigError::parse(
                origin,
                ConfigFormat::Yaml,
                "top level must be a mapping of sections",
            ));
        }
    };

    let mut sections = Sections::new();
    for (key, value) in mapping {
        let name = yaml_key_to_string(key);
        let section = match ConfigValue::from(value) {
            ConfigValue::Map(options) => options,
            ConfigValue::Null => Section::new(),
            _ => {
                return Err(ConfigError::parse(
                    origin,
                    ConfigFormat::Yaml,
                    format!("section '{name}' must be a mapping of options"),
                ));
            }
        };
        sections.insert(name, section);
    }
    Ok(sections)
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line == "---" || line == "..." || line.starts_with('#')
    })
}

pub(crate) fn render(sections: &Sections) -> Result<String> {
    let body = serde_yaml::to_string(sections).map_err(|e| ConfigError::Serialize {
        format: ConfigFormat::Yaml,
        message: e.to_string(),
    })?;
    Ok(format!("{DOCUMENT_START}{body}"))
}
