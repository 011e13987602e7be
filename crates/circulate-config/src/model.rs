// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Circulate admin server.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Circulate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CirculateConfig {
    /// Admin HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Discovery registry client settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Gazetteer data sources.
    #[serde(default)]
    pub geography: GeographyConfig,

    /// ODL2 import monitor settings.
    #[serde(default)]
    pub import: ImportConfig,

    /// Plugin enablement.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Admin HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the admin server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6500
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable SQLite WAL mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("circulate").join("circulate.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "circulate.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level for Circulate crates (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Timeout for each coverage request, in seconds.
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_registry_timeout(),
        }
    }
}

fn default_registry_timeout() -> u64 {
    20
}

/// Optional CSV datasets that extend the embedded gazetteer.
///
/// U.S. rows are `zip,city,state`; Canadian rows are `fsa,place,province`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeographyConfig {
    #[serde(default)]
    pub us_zipcodes_csv: Option<String>,

    #[serde(default)]
    pub ca_postal_csv: Option<String>,
}

/// ODL2 import monitor settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Cron expression for scheduled imports.
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Maximum number of feed pages followed per run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Timeout for feed and license status requests, in seconds.
    #[serde(default = "default_import_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            max_pages: default_max_pages(),
            timeout_secs: default_import_timeout(),
        }
    }
}

fn default_schedule() -> String {
    "0 */6 * * *".to_string()
}

fn default_max_pages() -> u32 {
    100
}

fn default_import_timeout() -> u64 {
    60
}

/// Plugin enablement, keyed by plugin name.
///
/// Plugins absent from the map are enabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    #[serde(default)]
    pub enabled: BTreeMap<String, bool>,
}

impl PluginsConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.get(name).copied().unwrap_or(true)
    }
}
