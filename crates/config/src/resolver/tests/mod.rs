//! Tests for the configuration resolver.
//!
//! Responsibilities:
//! - Test loading ini and YAML files through the builder.
//! - Test option lookup, underscore fallback and dotted names.
//! - Test path, environment and secret resolution.
//! - Test appending and exporting configuration.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod builder_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

pub const SECRET_KEY_HEX: &str =
    "42d13dfc9eb689e48c774aa5af8a7e15dbabcd5041939bef213eb37aed882fd6";

pub const SETUP_INI: &str = "\
# Example configuration
[DEFAULT]
BIRD_REPO_PATH = MOCK_BIRD_REPO
PDBX_REPO_PATH = MOCK_PDBX_SANDBOX
PROJECT_TOP = projects

[Section1]
ENV_OPTION_A = TEST_ENV_VAR
DATA_PATH = data/files
ABS_PATH = /srv/abs
REMOTE_URL = https://files.example.org/data
LIST_OPTION = a, b ,c
_SECRET_ONLY = hidden-value
plain_and_secret = plain
_plain_and_secret = secret

[Section2]
BIRD_REPO_PATH = OVERRIDDEN_BIRD_REPO
";

pub const SETUP_WITH_ENV_INI: &str = "\
[DEFAULT]
TOP_PROJECT_PATH = %(test_mockpath_env)s

[Section1]
PROJ_DIR_PATH = %(TOP_PROJECT_PATH)s/da_top
PROJ_ARCHIVE_PATH = %(PROJ_DIR_PATH)s/archive
proj_deposit_path = %(PROJ_DIR_PATH)s/deposit
";

pub const SETUP_YAML: &str = "\
---
DEFAULT:
    BIRD_REPO_PATH: MOCK_BIRD_REPO
    PDBX_REPO_PATH: MOCK_PDBX_SANDBOX
    RETRIES: 3
Section1:
    ENV_OPTION_A: TEST_ENV_VAR
    HOSTS:
        - alpha
        - beta
    SubA:
        Name: THE_NAME
        Location: /a/b/c/loc.dat
        Counts: [1, 2, 3]
        Measured: 1.1234
Section2:
    Name: section-two
";

pub const APPEND_YAML: &str = "\
Section1:
    ENV_OPTION_A: APPENDED_ENV_VAR
    NEW_OPTION: added
Section3:
    Name: section-three
";

/// Writes `content` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// A YAML config whose `_TEST_*` options are encrypted with [`SECRET_KEY_HEX`].
pub fn secret_yaml() -> String {
    let key = crate::secret::SecretKey::from_hex(SECRET_KEY_HEX, "TEST").unwrap();
    let username = crate::secret::encrypt_secret("testuser", &key).unwrap();
    let password = crate::secret::encrypt_secret("testuserpassword", &key).unwrap();
    format!(
        "\
Section1:
    CONFIG_SUPPORT_TOKEN: CONFIG_SUPPORT_TOKEN_ENV
    _TEST_USERNAME: {username}
    _TEST_PASSWORD: {password}
    SECRET_TEST_USERNAME: {username}
Section2:
    _TEST_USERNAME: {username}
DEFAULT:
    CONFIG_SUPPORT_TOKEN: CONFIG_SUPPORT_TOKEN_ENV
"
    )
}
