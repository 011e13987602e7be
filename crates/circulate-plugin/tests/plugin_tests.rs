// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route mounting and script running through the public registry API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use circulate_config::model::PluginsConfig;
use circulate_core::CirculateError;
use circulate_plugin::{
    Plugin, PluginManifest, PluginRegistry, PluginRoute, PluginScript, PluginSource,
};
use tower::ServiceExt;

static RUNS: AtomicUsize = AtomicUsize::new(0);

struct Counting;

#[async_trait]
impl PluginScript for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    async fn run(&self) -> Result<(), CirculateError> {
        RUNS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Failing;

#[async_trait]
impl PluginScript for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    async fn run(&self) -> Result<(), CirculateError> {
        Err(CirculateError::Internal("boom".into()))
    }
}

struct Reports;

impl Plugin for Reports {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new("cm-plugin-reports", "0.2.0", "Circulation reports")
    }

    fn routes(&self) -> Vec<PluginRoute> {
        vec![
            PluginRoute::new("status", "status", get(|| async { "ok" })),
            PluginRoute::new("", "broken", get(|| async { "never" })),
            PluginRoute::new("/status", "status_again", get(|| async { "shadow" })),
            PluginRoute::new("/items/{id}", "item", get(|| async { "item" })),
        ]
    }

    fn scripts(&self) -> Vec<Arc<dyn PluginScript>> {
        vec![Arc::new(Failing), Arc::new(Counting)]
    }
}

fn reports() -> Result<Box<dyn Plugin>, CirculateError> {
    Ok(Box::new(Reports))
}

fn registry(config: &PluginsConfig) -> PluginRegistry {
    PluginRegistry::discover(&[PluginSource::new("cm-plugin-reports", reports)], config)
}

async fn status_of(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn valid_routes_mount_under_plugin_prefix() {
    let router = registry(&PluginsConfig::default()).enable_all_routes(Router::new());

    let (status, body) = status_of(router.clone(), "/plugins/cm-plugin-reports/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, body) = status_of(router.clone(), "/plugins/cm-plugin-reports/items/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "item");

    let (status, _) = status_of(router, "/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disabled_plugins_mount_nothing() {
    let mut config = PluginsConfig::default();
    config.enabled.insert("cm-plugin-reports".into(), false);
    let router = registry(&config).enable_all_routes(Router::new());

    let (status, _) = status_of(router, "/plugins/cm-plugin-reports/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failing_script_does_not_stop_the_rest() {
    let before = RUNS.load(Ordering::SeqCst);
    let report = registry(&PluginsConfig::default()).run_all_scripts().await;

    assert_eq!(report.succeeded, vec!["cm-plugin-reports/counting"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "cm-plugin-reports/failing");
    assert!(report.failed[0].1.contains("boom"));
    assert_eq!(RUNS.load(Ordering::SeqCst), before + 1);
}
