// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry: discovery, route mounting, and script runs.
//!
//! Candidates are offered as [`PluginSource`]s. Anything that fails to load is
//! logged and skipped; one broken plugin or route never blocks the others.

use std::collections::{HashMap, HashSet};

use axum::Router;
use circulate_config::model::PluginsConfig;
use circulate_core::CirculateError;
use tracing::{debug, error, info, warn};

use crate::manifest::{PLUGIN_PREFIX, PluginManifest};
use crate::plugin::{Plugin, PluginSource};

/// Status of a plugin in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Enabled,
    Disabled,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Enabled => write!(f, "enabled"),
            PluginStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Outcome of running a plugin's scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub succeeded: Vec<String>,
    /// Script name and error message for each failed script.
    pub failed: Vec<(String, String)>,
}

impl ScriptReport {
    fn merge(&mut self, other: ScriptReport) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
    }
}

/// A validated plugin.
pub struct PluginEntry {
    pub manifest: PluginManifest,
    pub status: PluginStatus,
    plugin: Box<dyn Plugin>,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("manifest", &self.manifest)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl PluginEntry {
    /// Mount point for this plugin's routes.
    pub fn mount_point(&self) -> String {
        format!("/plugins/{}", self.manifest.name)
    }

    /// Register this plugin's routes on `router` under [`Self::mount_point`].
    ///
    /// Invalid or repeated rules are logged and skipped.
    pub fn enable_routes(&self, mut router: Router) -> Router {
        let mount = self.mount_point();
        let mut seen = HashSet::new();
        let mut mounted = 0usize;

        for route in self.plugin.routes() {
            let Some(path) = mounted_path(&mount, &route.rule) else {
                warn!(
                    plugin = %self.manifest.name,
                    endpoint = %route.endpoint,
                    rule = %route.rule,
                    "skipping plugin route with invalid rule"
                );
                continue;
            };
            if !seen.insert(route_shape(&path)) {
                warn!(
                    plugin = %self.manifest.name,
                    endpoint = %route.endpoint,
                    path = %path,
                    "skipping plugin route already registered"
                );
                continue;
            }
            debug!(plugin = %self.manifest.name, endpoint = %route.endpoint, path = %path, "route enabled");
            router = router.route(&path, route.handler);
            mounted += 1;
        }

        info!(plugin = %self.manifest.name, routes = mounted, "plugin routes enabled");
        router
    }

    /// Run every script this plugin declares. Failures are logged and counted;
    /// the remaining scripts still run.
    pub async fn run_scripts(&self) -> ScriptReport {
        let mut report = ScriptReport::default();
        for script in self.plugin.scripts() {
            let name = format!("{}/{}", self.manifest.name, script.name());
            match script.run().await {
                Ok(()) => {
                    info!(script = %name, "plugin script finished");
                    report.succeeded.push(name);
                }
                Err(e) => {
                    error!(script = %name, error = %e, "plugin script failed");
                    report.failed.push((name, e.to_string()));
                }
            }
        }
        report
    }
}

/// Join a plugin-relative rule onto the mount point, or `None` if the rule
/// is not a usable route path.
fn mounted_path(mount: &str, rule: &str) -> Option<String> {
    let relative = rule.strip_prefix('/').unwrap_or(rule);
    if relative.is_empty()
        || relative.chars().any(char::is_whitespace)
        || relative.contains("//")
        || relative.ends_with('/')
    {
        return None;
    }

    let segments: Vec<&str> = relative.split('/').collect();
    let last = segments.len() - 1;
    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return None;
        }
        if segment.contains('{') || segment.contains('}') {
            let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
            let (wildcard, name) = match inner.strip_prefix('*') {
                Some(name) => (true, name),
                None => (false, inner),
            };
            if name.is_empty()
                || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                || (wildcard && i != last)
            {
                return None;
            }
        }
    }
    Some(format!("{mount}/{relative}"))
}

/// Path with capture names erased, so `/a/{x}` and `/a/{y}` collide.
fn route_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment.starts_with('{') { "{}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_path_safe(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Registry of validated plugins keyed by name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: HashMap<String, PluginEntry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from candidates.
    ///
    /// Candidates without the `cm-plugin` prefix are ignored. Constructor
    /// failures, incomplete manifests, and duplicates are logged and skipped.
    pub fn discover(candidates: &[PluginSource], config: &PluginsConfig) -> Self {
        let mut registry = Self::new();
        for source in candidates {
            if !source.name.starts_with(PLUGIN_PREFIX) {
                debug!(candidate = %source.name, "ignoring non-plugin candidate");
                continue;
            }
            if let Err(e) = registry.load(source, config) {
                error!(candidate = %source.name, error = %e, "plugin skipped");
            }
        }
        info!(plugins = registry.len(), "plugin discovery complete");
        registry
    }

    fn load(&mut self, source: &PluginSource, config: &PluginsConfig) -> Result<(), CirculateError> {
        if !is_path_safe(&source.name) {
            return Err(CirculateError::Plugin {
                plugin: source.name.clone(),
                message: "name may only contain letters, digits, `-` and `_`".into(),
            });
        }
        if self.entries.contains_key(&source.name) {
            return Err(CirculateError::Plugin {
                plugin: source.name.clone(),
                message: "a plugin with this name is already registered".into(),
            });
        }

        let plugin = (source.constructor)()?;
        let manifest = plugin.manifest();
        manifest.validate(&source.name)?;

        let status = if config.is_enabled(&manifest.name) {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        self.register_with_status(plugin, status);
        Ok(())
    }

    /// Register an already constructed plugin, replacing any entry with the
    /// same name.
    pub fn register_with_status(&mut self, plugin: Box<dyn Plugin>, status: PluginStatus) {
        let manifest = plugin.manifest();
        info!(plugin = %manifest.name, version = %manifest.version, %status, "plugin registered");
        self.entries.insert(
            manifest.name.clone(),
            PluginEntry {
                manifest,
                status,
                plugin,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.entries.get(name)
    }

    /// All entries sorted by name.
    pub fn list_all(&self) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        entries
    }

    fn enabled(&self) -> impl Iterator<Item = &PluginEntry> {
        self.list_all()
            .into_iter()
            .filter(|entry| entry.status == PluginStatus::Enabled)
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), CirculateError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| CirculateError::NotFound {
                kind: "plugin".into(),
                id: name.into(),
            })?;
        entry.status = if enabled {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        Ok(())
    }

    /// Mount the routes of every enabled plugin.
    pub fn enable_all_routes(&self, router: Router) -> Router {
        self.enabled()
            .fold(router, |router, entry| entry.enable_routes(router))
    }

    /// Run the scripts of every enabled plugin, in name order.
    pub async fn run_all_scripts(&self) -> ScriptReport {
        let mut report = ScriptReport::default();
        for entry in self.enabled() {
            report.merge(entry.run_scripts().await);
        }
        report
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    struct Named(&'static str, &'static str);

    impl Plugin for Named {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new(self.0, self.1, "test plugin")
        }
    }

    fn good() -> Result<Box<dyn Plugin>, CirculateError> {
        Ok(Box::new(Named("cm-plugin-good", "0.1.0")))
    }

    fn broken() -> Result<Box<dyn Plugin>, CirculateError> {
        Err(CirculateError::Plugin {
            plugin: "cm-plugin-broken".into(),
            message: "failed to import".into(),
        })
    }

    fn no_version() -> Result<Box<dyn Plugin>, CirculateError> {
        Ok(Box::new(Named("cm-plugin-noversion", "")))
    }

    #[test]
    fn mounted_path_rewrites_relative_rules() {
        let mount = "/plugins/cm-plugin-a";
        assert_eq!(
            mounted_path(mount, "status").as_deref(),
            Some("/plugins/cm-plugin-a/status")
        );
        assert_eq!(
            mounted_path(mount, "/items/{id}").as_deref(),
            Some("/plugins/cm-plugin-a/items/{id}")
        );
        assert_eq!(
            mounted_path(mount, "files/{*rest}").as_deref(),
            Some("/plugins/cm-plugin-a/files/{*rest}")
        );
    }

    #[test]
    fn mounted_path_rejects_invalid_rules() {
        let mount = "/plugins/cm-plugin-a";
        for rule in ["", "/", "  ", "a b", "a//b", "a/", "items/:id", "{*rest}/x", "x{y}", "{}"] {
            assert_eq!(mounted_path(mount, rule), None, "rule {rule:?} should be rejected");
        }
    }

    #[test]
    fn route_shape_erases_capture_names() {
        assert_eq!(route_shape("/p/a/{x}"), route_shape("/p/a/{y}"));
        assert_ne!(route_shape("/p/a/b"), route_shape("/p/a/{y}"));
    }

    #[traced_test]
    #[test]
    fn discover_skips_bad_candidates() {
        let candidates = vec![
            PluginSource::new("cm-plugin-good", good),
            PluginSource::new("cm-plugin-good", good),
            PluginSource::new("cm-plugin-broken", broken),
            PluginSource::new("cm-plugin-noversion", no_version),
            PluginSource::new("cm-plugin-mismatch", good),
            PluginSource::new("unrelated", good),
        ];
        let registry = PluginRegistry::discover(&candidates, &PluginsConfig::default());

        assert_eq!(registry.len(), 1);
        assert!(registry.get("cm-plugin-good").is_some());
        assert!(logs_contain("failed to import"));
        assert!(logs_contain("already registered"));
    }

    #[test]
    fn config_disables_plugins() {
        let mut config = PluginsConfig::default();
        config.enabled.insert("cm-plugin-good".into(), false);
        let registry =
            PluginRegistry::discover(&[PluginSource::new("cm-plugin-good", good)], &config);
        assert_eq!(
            registry.get("cm-plugin-good").map(|e| e.status),
            Some(PluginStatus::Disabled)
        );
    }

    #[test]
    fn set_enabled_unknown_plugin_fails() {
        let mut registry = PluginRegistry::new();
        assert!(registry.set_enabled("cm-plugin-none", true).is_err());
        registry.register_with_status(Box::new(Named("cm-plugin-x", "0.1.0")), PluginStatus::Disabled);
        registry.set_enabled("cm-plugin-x", true).unwrap();
        assert_eq!(registry.get("cm-plugin-x").unwrap().status, PluginStatus::Enabled);
    }
}
