// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express: bind addresses,
//! non-empty paths, known log levels, positive limits, and readable
//! gazetteer datasets.

use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::CirculateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every error found.
pub fn validate_config(config: &CirculateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.registry.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "registry.timeout_secs must be at least 1",
        ));
    }

    if config.import.schedule.split_whitespace().count() < 5 {
        errors.push(ConfigError::validation(format!(
            "import.schedule `{}` is not a cron expression",
            config.import.schedule
        )));
    }
    if config.import.max_pages == 0 {
        errors.push(ConfigError::validation("import.max_pages must be at least 1"));
    }
    if config.import.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "import.timeout_secs must be at least 1",
        ));
    }

    let datasets = [
        ("geography.us_zipcodes_csv", &config.geography.us_zipcodes_csv),
        ("geography.ca_postal_csv", &config.geography.ca_postal_csv),
    ];
    for (key, path) in datasets {
        if let Some(path) = path
            && !Path::new(path).is_file()
        {
            errors.push(ConfigError::validation(format!(
                "{key} `{path}` does not exist"
            )));
        }
    }

    for name in config.plugins.enabled.keys() {
        if !name.starts_with("cm-plugin") {
            errors.push(ConfigError::validation(format!(
                "plugins.enabled key `{name}` is not a plugin name (expected a `cm-plugin` prefix)"
            )));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
