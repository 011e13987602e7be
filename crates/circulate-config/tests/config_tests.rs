// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Circulate configuration system.

use std::io::Write;

use circulate_config::diagnostic::ConfigError;
use circulate_config::model::CirculateConfig;
use circulate_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_circulate_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[storage]
database_path = "/tmp/circulate-test.db"
wal_mode = false

[logging]
level = "debug"

[registry]
timeout_secs = 5

[import]
schedule = "*/15 * * * *"
max_pages = 3
timeout_secs = 10

[plugins.enabled]
cm-plugin-reports = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.storage.database_path, "/tmp/circulate-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.registry.timeout_secs, 5);
    assert_eq!(config.import.schedule, "*/15 * * * *");
    assert_eq!(config.import.max_pages, 3);
    assert!(!config.plugins.is_enabled("cm-plugin-reports"));
    assert!(config.plugins.is_enabled("cm-plugin-other"));
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 6500);
    assert!(config.storage.wal_mode);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.registry.timeout_secs, 20);
    assert_eq!(config.import.max_pages, 100);
    assert!(config.geography.us_zipcodes_csv.is_none());
    assert!(config.plugins.enabled.is_empty());
}

#[test]
fn unknown_field_is_rejected_with_suggestion() {
    let toml = r#"
[storage]
databse_path = "x.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "databse_path");
            assert_eq!(suggestion.as_deref(), Some("database_path"));
            assert!(span.is_some());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("string port should fail");
    assert!(matches!(errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn semantic_errors_are_reported_after_parsing() {
    let toml = r#"
[logging]
level = "chatty"

[import]
max_pages = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("validation should fail");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn dotted_override_sets_nested_key() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: CirculateConfig = Figment::new()
        .merge(Serialized::defaults(CirculateConfig::default()))
        .merge(Toml::string("[import]\nmax_pages = 4\n"))
        .merge(("import.max_pages", 9))
        .extract()
        .expect("should merge override");

    assert_eq!(config.import.max_pages, 9);
}

#[test]
#[serial]
fn loads_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 7000").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.server.port, 7000);
}

#[test]
fn gazetteer_csv_paths_must_exist() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let toml = format!(
        "[geography]\nus_zipcodes_csv = \"{}\"\n",
        file.path().display()
    );
    assert!(load_and_validate_str(&toml).is_ok());

    let errors = load_and_validate_str("[geography]\nca_postal_csv = \"/no/such.csv\"\n")
        .expect_err("missing csv should fail");
    assert_eq!(errors.len(), 1);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[import]\nmax_pages = 4\nschedule = \"15 3 * * *\"").unwrap();

    // SAFETY: #[serial] keeps other env-reading tests from running concurrently.
    unsafe { std::env::set_var("CIRCULATE_IMPORT_MAX_PAGES", "12") };
    let loaded = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("CIRCULATE_IMPORT_MAX_PAGES") };

    let config = loaded.expect("env override should load");
    assert_eq!(config.import.max_pages, 12);
    assert_eq!(config.import.schedule, "15 3 * * *");
}
