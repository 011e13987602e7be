// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./circulate.toml` > `~/.config/circulate/circulate.toml`
//! > `/etc/circulate/circulate.toml` with environment variable overrides via the
//! `CIRCULATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CirculateConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/circulate/circulate.toml";
pub(crate) const LOCAL_CONFIG: &str = "circulate.toml";

/// Sections whose keys may be set from `CIRCULATE_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "server",
    "storage",
    "logging",
    "registry",
    "geography",
    "import",
    "plugins",
];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("circulate").join(LOCAL_CONFIG))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/circulate/circulate.toml`
/// 3. `~/.config/circulate/circulate.toml`
/// 4. `./circulate.toml`
/// 5. `CIRCULATE_*` environment variables
pub fn load_config() -> Result<CirculateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CirculateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CirculateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CirculateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CirculateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CirculateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `CIRCULATE_IMPORT_MAX_PAGES` to `import.max_pages`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("CIRCULATE_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
