// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup helpers shared by the subcommands.

use std::sync::Arc;

use circulate_config::CirculateConfig;
use circulate_core::{CirculateError, StorageAdapter};
use circulate_plugin::{PluginRegistry, PluginSource};
use circulate_storage::SqliteStorage;
use tracing::info;

/// Initialize the tracing subscriber with an `EnvFilter`.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("circulate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Opens and migrates the configured database.
pub async fn open_storage(config: &CirculateConfig) -> Result<Arc<SqliteStorage>, CirculateError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage opened");
    Ok(storage)
}

/// Plugins compiled into this binary.
pub fn builtin_plugins() -> Vec<PluginSource> {
    Vec::new()
}

/// Registers the built-in plugins, honoring `[plugins.enabled]`.
pub fn load_plugins(config: &CirculateConfig) -> PluginRegistry {
    PluginRegistry::discover(&builtin_plugins(), &config.plugins)
}


#[cfg(test)]
mod tests {
    use super::*;
    use circulate_core::{HealthStatus, ServiceAdapter};

    #[tokio::test]
    async fn open_storage_runs_migrations() {
        let (_dir, config) = test_support::temp_config();
        let storage = open_storage(&config).await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        assert!(storage.list_libraries().await.unwrap().is_empty());
    }

    #[test]
    fn no_builtin_plugins_yields_empty_registry() {
        let registry = load_plugins(&CirculateConfig::default());
        assert!(registry.is_empty());
    }
}
