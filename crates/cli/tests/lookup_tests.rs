//! Integration tests for the lookup commands.
//!
//! Responsibilities:
//! - Test `get`, `path`, `env`, `list` and `sections` against ini and YAML files.
//! - Test JSON output.

mod common;

use common::{SETUP_INI, SETUP_YAML, resolver_cmd, resolver_cmd_with_config, write_fixture};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_get_reads_default_section() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .args(["get", "BIRD_REPO_PATH"])
        .assert()
        .success()
        .stdout("MOCK_BIRD_REPO\n");

    resolver_cmd_with_config(&config)
        .args(["get", "BIRD_REPO_PATH", "-s", "Section2"])
        .assert()
        .success()
        .stdout("OVERRIDDEN_BIRD_REPO\n");
}

#[test]
fn test_get_applies_underscore_fallback_and_interpolation() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .args(["get", "SECRET_ONLY", "-s", "Section1"])
        .assert()
        .success()
        .stdout("hidden-value\n");

    resolver_cmd_with_config(&config)
        .args(["get", "RATE", "-s", "Section1"])
        .assert()
        .success()
        .stdout("50%\n");
}

#[test]
fn test_get_default_for_missing_option() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .args(["get", "NOPE", "-s", "Section1", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_get_dotted_name_in_yaml() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.yml", SETUP_YAML);

    resolver_cmd_with_config(&config)
        .args(["get", "SubA.Name", "-s", "Section1"])
        .assert()
        .success()
        .stdout("THE_NAME\n");
}

#[test]
fn test_get_json_output() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.yml", SETUP_YAML);

    let output = resolver_cmd_with_config(&config)
        .args(["get", "HOSTS", "-s", "Section1", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["section"], "Section1");
    assert_eq!(json["name"], "HOSTS");
    assert_eq!(json["value"], serde_json::json!(["alpha", "beta"]));
}

#[test]
fn test_path_joins_mock_top_path_and_prefix() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);
    let expected = dir.path().join("projects").join("data/files");

    resolver_cmd_with_config(&config)
        .arg("--mock-top-path")
        .arg(dir.path())
        .args(["path", "DATA_PATH", "-s", "Section1", "--prefix", "PROJECT_TOP"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected.display()));
}

#[test]
fn test_mock_top_path_from_environment() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .env("CONFIG_RESOLVER_MOCK_TOP_PATH", dir.path())
        .args(["path", "BIRD_REPO_PATH"])
        .assert()
        .success()
        .stdout(format!("{}\n", dir.path().join("MOCK_BIRD_REPO").display()));
}

#[test]
fn test_env_dereferences_variable() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .env("TEST_ENV_VAR", "from-environment")
        .args(["env", "ENV_OPTION_A", "-s", "Section1"])
        .assert()
        .success()
        .stdout("from-environment\n");
}

#[test]
fn test_list_prints_one_item_per_line() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .args(["list", "LIST_OPTION", "-s", "Section1"])
        .assert()
        .success()
        .stdout("a\nb\nc\n");
}

#[test]
fn test_sections_lists_names_in_order() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd_with_config(&config)
        .arg("sections")
        .assert()
        .success()
        .stdout("DEFAULT\nSection1\nSection2\n");
}

#[test]
fn test_config_path_from_environment() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(dir.path(), "setup.yml", SETUP_YAML);

    resolver_cmd()
        .env("CONFIG_RESOLVER_PATH", &config)
        .args(["get", "BIRD_REPO_PATH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MOCK_BIRD_REPO"));
}

#[test]
fn test_setup_cfg_in_working_directory_is_the_fallback() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "setup.cfg", SETUP_INI);

    resolver_cmd()
        .current_dir(dir.path())
        .args(["get", "PROJECT_TOP"])
        .assert()
        .success()
        .stdout("projects\n");
}
