// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `circulate serve` command.

use std::sync::Arc;

use circulate_admin::{AdminState, build_app, start_server};
use circulate_config::CirculateConfig;
use circulate_core::{CirculateError, StorageAdapter};
use circulate_geo::{Gazetteer, RegistryClient};
use tracing::{info, warn};

use crate::context;
use crate::shutdown;

/// Builds the shared admin state from configuration and opened storage.
pub fn admin_state(
    config: &CirculateConfig,
    storage: Arc<dyn StorageAdapter>,
) -> Result<AdminState, CirculateError> {
    let gazetteer = Gazetteer::from_config(&config.geography)?;
    let registry_http = RegistryClient::http_client(config.registry.timeout_secs)?;
    Ok(AdminState::new(storage, Arc::new(gazetteer), registry_http))
}

/// Runs the admin server until SIGINT or SIGTERM.
pub async fn run_serve(config: CirculateConfig) -> Result<(), CirculateError> {
    info!("starting circulate serve");

    let storage = context::open_storage(&config).await?;
    let plugins = context::load_plugins(&config);
    let state = admin_state(&config, storage.clone())?;
    let app = build_app(state, &plugins);

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&config.server, app, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    served?;
    info!("circulate serve stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::temp_config;

    #[tokio::test]
    async fn admin_state_uses_embedded_gazetteer_by_default() {
        let (_dir, config) = temp_config();
        let storage = context::open_storage(&config).await.unwrap();
        let state = admin_state(&config, storage).unwrap();
        assert!(state.gazetteer.is_us_state("IL"));
        assert!(state.place_lookup.is_none());
    }

    #[tokio::test]
    async fn missing_zipcode_file_fails_startup() {
        let (dir, mut config) = temp_config();
        config.geography.us_zipcodes_csv = Some(dir.path().join("absent.csv").display().to_string());
        let storage = context::open_storage(&config).await.unwrap();
        assert!(admin_state(&config, storage).is_err());
    }
}
