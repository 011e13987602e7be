// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The contract between Circulate and a plugin.

use std::sync::Arc;

use async_trait::async_trait;
use axum::routing::MethodRouter;
use circulate_core::CirculateError;

use crate::manifest::PluginManifest;

/// An HTTP route contributed by a plugin.
///
/// `rule` is relative to the plugin's mount point, `/plugins/<name>`.
pub struct PluginRoute {
    pub rule: String,
    pub endpoint: String,
    pub handler: MethodRouter,
}

impl PluginRoute {
    pub fn new(rule: impl Into<String>, endpoint: impl Into<String>, handler: MethodRouter) -> Self {
        Self {
            rule: rule.into(),
            endpoint: endpoint.into(),
            handler,
        }
    }
}

impl std::fmt::Debug for PluginRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRoute")
            .field("rule", &self.rule)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// A unit of background work a plugin wants run on demand.
#[async_trait]
pub trait PluginScript: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<(), CirculateError>;
}

/// A compiled-in plugin.
pub trait Plugin: Send + Sync {
    fn manifest(&self) -> PluginManifest;

    fn routes(&self) -> Vec<PluginRoute> {
        Vec::new()
    }

    fn scripts(&self) -> Vec<Arc<dyn PluginScript>> {
        Vec::new()
    }
}

/// Constructor signature for a plugin candidate.
pub type PluginConstructor = fn() -> Result<Box<dyn Plugin>, CirculateError>;

/// A named plugin candidate offered to the registry.
#[derive(Clone)]
pub struct PluginSource {
    pub name: String,
    pub constructor: PluginConstructor,
}

impl PluginSource {
    pub fn new(name: impl Into<String>, constructor: PluginConstructor) -> Self {
        Self {
            name: name.into(),
            constructor,
        }
    }
}

impl std::fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginSource").field("name", &self.name).finish()
    }
}
