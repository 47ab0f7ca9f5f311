//! Configuration file formats.
//!
//! Responsibilities:
//! - Name the supported formats and detect them from file names.
//! - Dispatch parsing and rendering to the ini and YAML codecs.
//!
//! Does NOT handle:
//! - Reading bytes from disk or the network (see `source.rs`).
//! - Lookup semantics (see `resolver`).

pub(crate) mod ini;
pub(crate) mod yaml;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::store::Sections;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Python configparser-style ini files.
    #[default]
    Ini,
    /// YAML mapping of sections to option mappings.
    Yaml,
}

impl ConfigFormat {
    /// Detects the format from a file name extension.
    ///
    /// Returns `None` when the extension is missing or not recognized.
    pub fn from_extension(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "ini" => Some(Self::Ini),
            _ => None,
        }
    }

    /// Detects the format from a file name, falling back to `default`.
    pub fn detect(path: &str, default: ConfigFormat) -> Self {
        Self::from_extension(path).unwrap_or(default)
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ini => "ini",
            Self::Yaml => "yaml",
        }
    }

    /// The format an export converts to by default.
    pub fn other(self) -> Self {
        match self {
            Self::Ini => Self::Yaml,
            Self::Yaml => Self::Ini,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ini" | "configparser" | "cfg" => Ok(Self::Ini),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Options that influence parsing.
#[derive(Debug, Clone)]
pub(crate) struct ParseOptions {
    /// Name of the ini section whose options every other section inherits.
    pub default_section: String,
    /// Seed the ini default section with the process environment.
    pub import_environment: bool,
}

/// Parses configuration text in the given format.
///
/// `origin` names the source in error messages.
pub(crate) fn parse(
    text: &str,
    format: ConfigFormat,
    origin: &str,
    options: &ParseOptions,
) -> Result<Sections> {
    match format {
        ConfigFormat::Ini => ini::parse(text, origin, options),
        ConfigFormat::Yaml => yaml::parse(text, origin),
    }
}

/// Renders sections in the given format.
pub(crate) fn render(
    sections: &Sections,
    format: ConfigFormat,
    default_section: &str,
) -> Result<String> {
    match format {
        ConfigFormat::Ini => Ok(ini::render(sections, default_section)),
        ConfigFormat::Yaml => yaml::render(sections),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str_accepts_aliases() {
        assert_eq!("ini".parse::<ConfigFormat>().unwrap(), ConfigFormat::Ini);
        assert_eq!(
            "ConfigParser".parse::<ConfigFormat>().unwrap(),
            ConfigFormat::Ini
        );
        assert_eq!("YAML".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!("yml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
    }

    #[test]
    fn test_format_from_str_rejects_unknown() {
        let err = "toml".parse::<ConfigFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref f) if f == "toml"));
    }

    #[test]
    fn test_detect_from_extension() {
        assert_eq!(
            ConfigFormat::detect("conf/setup-example.yml", ConfigFormat::Ini),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::detect("https://host/a/b.YAML", ConfigFormat::Ini),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::detect("setup.cfg", ConfigFormat::Yaml),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::detect("setup.ini", ConfigFormat::Yaml),
            ConfigFormat::Ini
        );
        assert_eq!(ConfigFormat::detect("setup", ConfigFormat::Ini), ConfigFormat::Ini);
    }
}
