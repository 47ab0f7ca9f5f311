//! Centralized constants for the config-resolver workspace.
//!
//! Reserved option names and defaults shared by the library and the CLI.

// =============================================================================
// Section & Option Names
// =============================================================================

/// Name of the section holding default option values.
pub const DEFAULT_SECTION_NAME: &str = "DEFAULT";

/// Option whose value names the environment variable holding the secret key.
pub const DEFAULT_TOKEN_OPTION: &str = "CONFIG_SUPPORT_TOKEN";

/// Option in the default section listing further configuration locators.
pub const DEFAULT_APPEND_OPTION: &str = "CONFIG_APPEND_LOCATOR_PATHS";

/// Prefix marking an option as secret.
pub const SECRET_PREFIX: char = '_';

/// Config file used when a fallback environment variable is named but unset.
pub const FALLBACK_CONFIG_FILE: &str = "setup.cfg";

// =============================================================================
// Parsing & Rendering
// =============================================================================

/// Delimiter used to split string options into lists and to join lists on ini export.
pub const DEFAULT_LIST_DELIMITER: &str = ",";

/// Maximum nesting of `%(name)s` references in ini values.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// URI schemes that mark a path option as already fully qualified.
pub const QUALIFIED_PATH_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "file://"];

// =============================================================================
// Secrets
// =============================================================================

/// Secret key length in bytes (AES-256).
pub const SECRET_KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const SECRET_NONCE_LEN: usize = 12;

/// Placeholder printed instead of secret values.
pub const REDACTED: &str = "********";

// =============================================================================
// Remote Assets
// =============================================================================

/// Application name used for platform cache directories.
pub const CACHE_APP_NAME: &str = "config-resolver";

/// Subdirectory of the cache dir holding fetched configuration files.
pub const CACHE_CONFIG_SUBDIR: &str = "config";
