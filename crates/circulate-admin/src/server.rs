// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the admin API.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use axum::{Router, middleware as axum_middleware};
use circulate_config::model::ServerConfig;
use circulate_core::types::{goals, protocols};
use circulate_core::{CirculateError, PlaceLookup, StorageAdapter};
use circulate_geo::{Gazetteer, RegistryClient};
use circulate_plugin::PluginRegistry;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth;
use crate::handlers;

/// Largest accepted request body; logo uploads arrive inline.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state for admin request handlers.
#[derive(Clone)]
pub struct AdminState {
    pub storage: Arc<dyn StorageAdapter>,
    pub gazetteer: Arc<Gazetteer>,
    /// Client used for registry coverage requests.
    pub registry_http: reqwest::Client,
    /// Replaces the registry lookup, for tests and offline deployments.
    pub place_lookup: Option<Arc<dyn PlaceLookup>>,
}

impl AdminState {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        gazetteer: Arc<Gazetteer>,
        registry_http: reqwest::Client,
    ) -> Self {
        Self {
            storage,
            gazetteer,
            registry_http,
            place_lookup: None,
        }
    }

    pub fn with_place_lookup(mut self, lookup: Arc<dyn PlaceLookup>) -> Self {
        self.place_lookup = Some(lookup);
        self
    }

    /// The lookup used for places the gazetteer cannot resolve.
    ///
    /// Without an override this asks the configured discovery registries,
    /// read fresh on each request so newly added registries take effect.
    pub async fn place_lookup(&self) -> Result<Arc<dyn PlaceLookup>, CirculateError> {
        if let Some(lookup) = &self.place_lookup {
            return Ok(Arc::clone(lookup));
        }
        let registries = self
            .storage
            .integrations_for(protocols::OPDS_REGISTRATION, goals::DISCOVERY)
            .await?;
        Ok(Arc::new(RegistryClient::from_integrations(
            self.registry_http.clone(),
            &registries,
        )))
    }
}

impl std::fmt::Debug for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminState")
            .field("place_lookup", &self.place_lookup.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds the admin router:
/// - GET /health (no auth)
/// - GET, POST /admin/libraries
/// - DELETE /admin/library/{uuid}
/// - GET, POST /admin/search_services
/// - DELETE /admin/search_service/{id}
pub fn build_router(state: AdminState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/admin/libraries",
            get(handlers::get_libraries).post(handlers::post_libraries),
        )
        .route("/admin/library/{uuid}", delete(handlers::delete_library))
        .route(
            "/admin/search_services",
            get(handlers::search_services).post(handlers::search_services),
        )
        .route(
            "/admin/search_service/{id}",
            delete(handlers::delete_search_service),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// The admin router with every enabled plugin's routes mounted.
pub fn build_app(state: AdminState, plugins: &PluginRegistry) -> Router {
    plugins.enable_all_routes(build_router(state))
}

/// Serves `app` on the configured address until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), CirculateError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CirculateError::Http {
            message: format!("failed to bind admin server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("admin server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| CirculateError::Http {
            message: format!("admin server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("admin server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use circulate_test_utils::{MockPlaceLookup, TestHarness};

    #[test]
    fn admin_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AdminState>();
    }

    #[tokio::test]
    async fn place_lookup_prefers_override() {
        let harness = TestHarness::new().await.unwrap();
        let lookup: Arc<dyn PlaceLookup> = Arc::new(MockPlaceLookup::new());
        let state = AdminState::new(
            harness.storage(),
            Arc::new(Gazetteer::embedded()),
            reqwest::Client::new(),
        )
        .with_place_lookup(Arc::clone(&lookup));
        let resolved = state.place_lookup().await.unwrap();
        assert!(Arc::ptr_eq(&resolved, &lookup));
    }

    #[tokio::test]
    async fn start_server_stops_on_cancel() {
        let harness = TestHarness::new().await.unwrap();
        let state = AdminState::new(
            harness.storage(),
            Arc::new(Gazetteer::embedded()),
            reqwest::Client::new(),
        );
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        };
        let token = CancellationToken::new();
        token.cancel();
        start_server(&config, build_router(state), token).await.unwrap();
    }
}
