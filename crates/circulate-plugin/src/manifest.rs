// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifests.
//!
//! A plugin describes itself with a [`PluginManifest`], built in code or
//! parsed from an embedded `plugin.toml`.

use circulate_core::CirculateError;
use serde::{Deserialize, Serialize};

/// Name prefix every plugin must carry.
pub const PLUGIN_PREFIX: &str = "cm-plugin";

/// Identity of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique name, e.g. `cm-plugin-reports`.
    pub name: String,
    /// Semantic version string.
    pub version: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    plugin: PluginManifest,
}

impl PluginManifest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Parse the `[plugin]` table of a `plugin.toml`.
    pub fn from_toml(content: &str) -> Result<Self, CirculateError> {
        let file: ManifestFile = toml::from_str(content)
            .map_err(|e| CirculateError::Config(format!("invalid plugin manifest: {e}")))?;
        Ok(file.plugin)
    }

    /// Check that the manifest is complete and belongs to the candidate it
    /// was loaded from.
    pub fn validate(&self, candidate: &str) -> Result<(), CirculateError> {
        let fail = |message: String| CirculateError::Plugin {
            plugin: candidate.to_string(),
            message,
        };
        if self.name.trim().is_empty() {
            return Err(fail("manifest name must not be empty".into()));
        }
        if self.name != candidate {
            return Err(fail(format!(
                "manifest name `{}` does not match the registered name",
                self.name
            )));
        }
        if self.version.trim().is_empty() {
            return Err(fail("manifest version must not be empty".into()));
        }
        semver::Version::parse(&self.version)
            .map_err(|e| fail(format!("manifest version `{}`: {e}", self.version)))?;
        Ok(())
    }
}
