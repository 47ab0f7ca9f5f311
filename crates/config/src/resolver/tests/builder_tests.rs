//! Loading tests for the resolver builder.
//!
//! Responsibilities:
//! - Test format detection and explicit formats.
//! - Test missing, unreadable and malformed sources.
//! - Test the fallback environment variable and remote sources.
//! - Test automatic appending of listed locators.

use crate::error::ConfigError;
use crate::format::ConfigFormat;
use crate::resolver::ConfigResolver;
use crate::source::ConfigSource;
use crate::value::ConfigValue;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

use super::{APPEND_YAML, SETUP_INI, SETUP_YAML, env_lock, write_fixture};

#[test]
fn test_load_ini_by_default() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "setup-example.cfg", SETUP_INI);

    let cfg = ConfigResolver::load(path.clone(), None, None).unwrap();
    assert_eq!(cfg.format(), ConfigFormat::Ini);
    assert_eq!(cfg.config_path(), Some(&ConfigSource::Path(path)));
    assert_eq!(
        cfg.get_option("BIRD_REPO_PATH", None).unwrap(),
        ConfigValue::from("MOCK_BIRD_REPO")
    );
}

#[test]
fn test_load_detects_yaml_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "setup-example.yml", SETUP_YAML);

    let cfg = ConfigResolver::load(path, None, None).unwrap();
    assert_eq!(cfg.format(), ConfigFormat::Yaml);
    assert_eq!(
        cfg.get_option("RETRIES", Some("DEFAULT")).unwrap(),
        ConfigValue::Integer(3)
    );
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "setup-example.cfg", SETUP_YAML);

    let cfg = ConfigResolver::load(path, Some(ConfigFormat::Yaml), None).unwrap();
    assert_eq!(cfg.format(), ConfigFormat::Yaml);
    assert_eq!(
        cfg.get_option("Name", Some("Section2")).unwrap(),
        ConfigValue::from("section-two")
    );
}

#[test]
fn test_missing_file_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let result = ConfigResolver::load(dir.path().join("missing.cfg"), None, None);
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_malformed_files_are_parse_errors() {
    let dir = TempDir::new().unwrap();
    let ini = write_fixture(dir.path(), "bad.cfg", "no header = here\n");
    let yaml = write_fixture(dir.path(), "bad.yml", "DEFAULT: [unclosed\n");

    assert!(matches!(
        ConfigResolver::load(ini, None, None),
        Err(ConfigError::Parse { format: ConfigFormat::Ini, .. })
    ));
    assert!(matches!(
        ConfigResolver::load(yaml, None, None),
        Err(ConfigError::Parse { format: ConfigFormat::Yaml, .. })
    ));
}

#[test]
fn test_yaml_parsed_as_ini_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "setup.yml", SETUP_YAML);
    let result = ConfigResolver::load(path, Some(ConfigFormat::Ini), None);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_no_source_builds_empty_resolver() {
    let cfg = ConfigResolver::builder()
        .with_format(ConfigFormat::Yaml)
        .load()
        .unwrap();
    assert!(cfg.store().is_empty());
    assert!(cfg.config_path().is_none());
    assert_eq!(cfg.format(), ConfigFormat::Yaml);
}

#[test]
#[serial]
fn test_fallback_env_names_config_path() {
    let _lock = env_lock().lock().unwrap();
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "from-env.cfg", SETUP_INI);

    temp_env::with_vars([("CR_TEST_CONFIG_PATH", Some(path.to_str().unwrap()))], || {
        let cfg = ConfigResolver::builder()
            .with_fallback_env("CR_TEST_CONFIG_PATH")
            .load()
            .unwrap();
        assert_eq!(cfg.config_path(), Some(&ConfigSource::Path(path.clone())));
    });
}

#[test]
#[serial]
fn test_unset_fallback_env_uses_setup_cfg() {
    let _lock = env_lock().lock().unwrap();
    temp_env::with_vars([("CR_TEST_CONFIG_PATH", None::<&str>)], || {
        let builder = ConfigResolver::builder().with_fallback_env("CR_TEST_CONFIG_PATH");
        assert_eq!(
            builder.resolved_source(),
            Some(ConfigSource::Path(PathBuf::from("setup.cfg")))
        );
    });
}

#[test]
#[serial]
fn test_explicit_path_wins_over_fallback_env() {
    let _lock = env_lock().lock().unwrap();
    temp_env::with_vars([("CR_TEST_CONFIG_PATH", Some("/elsewhere/setup.cfg"))], || {
        let builder = ConfigResolver::builder()
            .with_config_path("conf/mine.cfg")
            .with_fallback_env("CR_TEST_CONFIG_PATH");
        assert_eq!(
            builder.resolved_source(),
            Some(ConfigSource::Path(PathBuf::from("conf/mine.cfg")))
        );
    });
}

#[test]
fn test_custom_default_section() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "custom.cfg", "[site]\nHOST = example.org\n[A]\nx = 1\n");

    let cfg = ConfigResolver::builder()
        .with_config_path(path)
        .with_default_section("site")
        .load()
        .unwrap();

    assert_eq!(cfg.default_section_name(), "site");
    assert_eq!(cfg.get_string("HOST", None).unwrap(), "example.org");
    // Requests for DEFAULT are routed to the configured default section.
    assert_eq!(cfg.get_string("HOST", Some("DEFAULT")).unwrap(), "example.org");
    assert_eq!(cfg.get_string("HOST", Some("A")).unwrap(), "example.org");
}

#[test]
fn test_load_from_url() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/conf/setup-example.yml")
        .with_status(200)
        .with_body(SETUP_YAML)
        .create();

    let url = format!("{}/conf/setup-example.yml", server.url());
    let cfg = ConfigResolver::load(url.as_str(), None, None).unwrap();
    assert_eq!(cfg.format(), ConfigFormat::Yaml);
    assert!(cfg.config_path().unwrap().is_remote());
    assert_eq!(
        cfg.get_string("BIRD_REPO_PATH", None).unwrap(),
        "MOCK_BIRD_REPO"
    );
    mock.assert();
}

#[test]
fn test_listed_locators_are_appended() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/assets/setup-example-append.yml")
        .with_status(200)
        .with_body(APPEND_YAML)
        .create();

    let dir = TempDir::new().unwrap();
    let local_extra = write_fixture(dir.path(), "local-extra.yml", "Section4:\n    Local: yes-local\n");
    // The locator list lives in the default section.
    let config = SETUP_YAML.replacen(
        "DEFAULT:\n",
        &format!(
            "DEFAULT:\n    CONFIG_APPEND_LOCATOR_PATHS:\n        - {}/assets/setup-example-append.yml\n        - {}\n",
            server.url(),
            local_extra.display()
        ),
        1,
    );
    let path = write_fixture(dir.path(), "setup-example.yml", &config);
    let cache = TempDir::new().unwrap();

    let cfg = ConfigResolver::builder()
        .with_config_path(path)
        .with_cache_dir(cache.path())
        .load()
        .unwrap();

    assert_eq!(cfg.get_string("ENV_OPTION_A", Some("Section1")).unwrap(), "APPENDED_ENV_VAR");
    assert_eq!(cfg.get_string("NEW_OPTION", Some("Section1")).unwrap(), "added");
    assert_eq!(cfg.get_string("Name", Some("Section3")).unwrap(), "section-three");
    assert_eq!(cfg.get_string("Local", Some("Section4")).unwrap(), "yes-local");
    // Options absent from the appended file survive.
    assert_eq!(cfg.get_list("HOSTS", Some("Section1")).unwrap(), vec!["alpha", "beta"]);
    assert!(cache.path().join("config").join("setup-example-append.yml").is_file());
    mock.assert();
}

#[test]
fn test_append_option_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        dir.path(),
        "setup.cfg",
        "[DEFAULT]\nCONFIG_APPEND_LOCATOR_PATHS = does-not-exist.cfg\n",
    );

    let result = ConfigResolver::builder().with_config_path(path.clone()).load();
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

    let cfg = ConfigResolver::builder()
        .with_config_path(path)
        .with_append_option(None)
        .load()
        .unwrap();
    assert_eq!(
        cfg.get_string("CONFIG_APPEND_LOCATOR_PATHS", None).unwrap(),
        "does-not-exist.cfg"
    );
}
