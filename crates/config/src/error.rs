//! Error types for configuration loading and lookup.
//!
//! Responsibilities:
//! - Define error variants for every load, parse, lookup and secret failure.
//! - Provide a crate-wide `Result` alias.
//!
//! Does NOT handle:
//! - Mapping errors to process exit codes (see the CLI crate).
//!
//! Invariants:
//! - All error variants include context for debugging (section, option, path, variable).
//! - Secret values and decrypted plaintext NEVER appear in error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::ConfigFormat;

/// Errors that can occur while loading or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch configuration from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse {format} configuration from {origin}: {message}")]
    Parse {
        origin: String,
        format: ConfigFormat,
        message: String,
    },

    #[error("Unsupported configuration format: {0} (expected ini or yaml)")]
    UnsupportedFormat(String),

    #[error("Section '{0}' not found in configuration")]
    MissingSection(String),

    #[error("Option '{name}' not found in section '{section}'")]
    MissingOption { section: String, name: String },

    #[error("Environment variable '{var}' referenced by option '{option}' is not set")]
    MissingEnvVar { option: String, var: String },

    #[error("Option '{name}' in section '{section}' is not a string")]
    NotAString { section: String, name: String },

    #[error("Invalid secret key in '{var}': expected 64 hex characters")]
    InvalidSecretKey { var: String },

    #[error("Failed to decrypt secret option '{name}': {message}")]
    SecretDecryption { name: String, message: String },

    #[error("Failed to encrypt secret: {0}")]
    SecretEncryption(String),

    #[error("Failed to serialize configuration as {format}: {message}")]
    Serialize {
        format: ConfigFormat,
        message: String,
    },

    #[error("Failed to write configuration file at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns true for lookups that failed only because a key was absent.
    ///
    /// These are the errors the `*_or` accessors turn into the caller's default.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingOption { .. } | ConfigError::MissingSection(_)
        )
    }

    pub(crate) fn parse(
        origin: impl Into<String>,
        format: ConfigFormat,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::Parse {
            origin: origin.into(),
            format,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
