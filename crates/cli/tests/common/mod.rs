//! Shared test utilities for config-resolver integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide sample configuration files.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `CONFIG_RESOLVER_*` variables from the host never leak into tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub const KEY_HEX: &str = "42d13dfc9eb689e48c774aa5af8a7e15dbabcd5041939bef213eb37aed882fd6";

pub const SETUP_INI: &str = "\
[DEFAULT]
BIRD_REPO_PATH = MOCK_BIRD_REPO
PROJECT_TOP = projects

[Section1]
ENV_OPTION_A = TEST_ENV_VAR
DATA_PATH = data/files
LIST_OPTION = a, b ,c
_SECRET_ONLY = hidden-value
RATE = 50%%

[Section2]
BIRD_REPO_PATH = OVERRIDDEN_BIRD_REPO
";

pub const SETUP_YAML: &str = "\
---
DEFAULT:
    BIRD_REPO_PATH: MOCK_BIRD_REPO
Section1:
    HOSTS:
        - alpha
        - beta
    SubA:
        Name: THE_NAME
        Counts: [1, 2, 3]
";

/// Returns a hermetic `config-resolver` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Config path and mock top path variables are cleared.
pub fn resolver_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("config-resolver");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    // Clear potential host leakage
    cmd.env_remove("CONFIG_RESOLVER_PATH")
        .env_remove("CONFIG_RESOLVER_MOCK_TOP_PATH")
        .env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic command reading `config`.
pub fn resolver_cmd_with_config(config: &Path) -> Command {
    let mut cmd = resolver_cmd();
    cmd.arg("--config-path").arg(config);
    cmd
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
