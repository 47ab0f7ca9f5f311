//! CLI exit codes and startup errors.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` variants to appropriate exit codes.
//! - Describe `.env` loading failures without echoing file contents.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-6 are reserved for specific error categories.
//! - Dotenv errors never include the offending line, which may hold secrets.

use config_resolver::ConfigError;
use thiserror::Error;

/// Structured exit codes for config-resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Source error - the configuration file could not be read or fetched.
    ///
    /// Scripts should check the path or URL; remote fetches may be retried.
    SourceError = 3,

    /// Not found - the requested section or option does not exist.
    NotFound = 4,

    /// Format error - the file could not be parsed or serialized.
    FormatError = 5,

    /// Environment error - a referenced variable is unset or a secret failed to decrypt.
    ///
    /// Scripts should export the variable or check the key.
    EnvironmentError = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::FileNotFound(_)
            | ConfigError::Read { .. }
            | ConfigError::Fetch { .. }
            | ConfigError::Write { .. } => ExitCode::SourceError,

            ConfigError::MissingSection(_) | ConfigError::MissingOption { .. } => {
                ExitCode::NotFound
            }

            ConfigError::Parse { .. }
            | ConfigError::UnsupportedFormat(_)
            | ConfigError::NotAString { .. }
            | ConfigError::Serialize { .. } => ExitCode::FormatError,

            ConfigError::MissingEnvVar { .. }
            | ConfigError::InvalidSecretKey { .. }
            | ConfigError::SecretDecryption { .. }
            | ConfigError::SecretEncryption(_) => ExitCode::EnvironmentError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no `ConfigError` is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}

/// Failures while loading `.env` before argument parsing.
#[derive(Debug, Error)]
pub enum DotenvError {
    #[error("Failed to parse .env file at line {line}")]
    Parse { line: usize },

    #[error("Failed to read .env file: {kind}")]
    Io { kind: std::io::ErrorKind },

    #[error("Failed to load .env file")]
    Unknown,
}
