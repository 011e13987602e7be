// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end import runs against a mocked ODL feed.

use std::sync::Arc;

use circulate_config::model::ImportConfig;
use circulate_core::types::{goals, protocols};
use circulate_core::{ExternalIntegration, StorageAdapter};
use circulate_odl::{Odl2ImportMonitor, SERVICE_NAME, collection_monitors};
use circulate_storage::SqliteStorage;
use circulate_test_utils::TestHarness;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str, base: &str) -> String {
    let raw = match name {
        "page1" => include_str!("fixtures/page1.json"),
        "page2" => include_str!("fixtures/page2.json"),
        other => panic!("unknown fixture {other}"),
    };
    raw.replace("{{BASE}}", base)
}

async fn mount_feed(server: &MockServer) {
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("page2", &base)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("page1", &base)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/licenses/1a/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"checkouts": {"left": 40, "available": 2}})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/licenses/1b/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"checkouts": {"left": 10, "available": 1}})),
        )
        .mount(server)
        .await;
}

async fn collection(harness: &TestHarness, url: &str) -> ExternalIntegration {
    harness
        .add_integration(
            protocols::ODL2,
            goals::LICENSES,
            Some("ODL collection"),
            &[("url", url), ("data_source", "ODL Publisher")],
        )
        .await
        .unwrap()
}

fn monitor(
    harness: &TestHarness,
    collection: ExternalIntegration,
    config: &ImportConfig,
) -> Odl2ImportMonitor {
    let storage: Arc<SqliteStorage> = harness.storage();
    Odl2ImportMonitor::new(
        collection,
        reqwest::Client::new(),
        storage.clone(),
        storage,
        config,
    )
    .unwrap()
}

#[tokio::test]
async fn run_follows_pages_and_records_timestamp() {
    let server = MockServer::start().await;
    mount_feed(&server).await;
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, &format!("{}/feed", server.uri())).await;
    let collection_id = collection.id;

    let timestamp = monitor(&harness, collection, &ImportConfig::default())
        .run_once()
        .await
        .unwrap();
    assert_eq!(timestamp.service, SERVICE_NAME);
    assert_eq!(timestamp.counter, Some(2));
    assert_eq!(timestamp.exception, None);

    let storage = harness.storage();
    let first = storage
        .work("ODL Publisher", "urn:isbn:9781111111111")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.licenses_owned, 4);
    assert_eq!(first.licenses_available, 3);
    assert_eq!(first.license_count, 2);
    assert_eq!(first.format_count, 1);
    assert_eq!(first.medium.as_deref(), Some("Book"));

    let second = storage
        .work("ODL Publisher", "urn:isbn:9782222222222")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.licenses_owned, 2);
    assert_eq!(second.licenses_available, 0);
    assert_eq!(second.medium.as_deref(), Some("Audio"));

    let recorded = storage
        .latest_timestamp(SERVICE_NAME, Some(collection_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recorded.counter, Some(2));
}

#[tokio::test]
async fn page_limit_stops_pagination() {
    let server = MockServer::start().await;
    mount_feed(&server).await;
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, &format!("{}/feed", server.uri())).await;

    let config = ImportConfig {
        max_pages: 1,
        ..ImportConfig::default()
    };
    let timestamp = monitor(&harness, collection, &config)
        .run_once()
        .await
        .unwrap();
    assert_eq!(timestamp.counter, Some(1));
    assert!(
        harness
            .storage()
            .work("ODL Publisher", "urn:isbn:9782222222222")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn reimport_replaces_circulation() {
    let server = MockServer::start().await;
    mount_feed(&server).await;
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, &format!("{}/feed", server.uri())).await;
    let monitor = monitor(&harness, collection, &ImportConfig::default());

    monitor.run_once().await.unwrap();
    monitor.run_once().await.unwrap();

    let work = harness
        .storage()
        .work("ODL Publisher", "urn:isbn:9781111111111")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(work.license_count, 2);
    assert_eq!(work.licenses_owned, 4);
}

#[tokio::test]
async fn unreachable_feed_is_recorded_as_exception() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, &format!("{}/feed", server.uri())).await;

    let timestamp = monitor(&harness, collection, &ImportConfig::default())
        .run_once()
        .await
        .unwrap();
    assert_eq!(timestamp.counter, Some(0));
    let exception = timestamp.exception.unwrap();
    assert!(exception.contains("500"), "{exception}");
}

#[tokio::test]
async fn collection_monitors_skip_collections_without_url() {
    let harness = TestHarness::new().await.unwrap();
    collection(&harness, "https://odl.example/feed").await;
    harness
        .add_integration(protocols::ODL2, goals::LICENSES, Some("Broken"), &[])
        .await
        .unwrap();
    harness
        .add_integration(
            protocols::ELASTICSEARCH,
            goals::SEARCH,
            Some("Search"),
            &[("url", "https://search")],
        )
        .await
        .unwrap();

    let storage = harness.storage();
    let monitors = collection_monitors(storage.clone(), storage, &ImportConfig::default())
        .await
        .unwrap();
    assert_eq!(monitors.len(), 1);
    assert_eq!(monitors[0].collection().name.as_deref(), Some("ODL collection"));
}

#[tokio::test]
async fn scheduler_stops_when_cancelled() {
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, "https://odl.example/feed").await;
    let monitor = monitor(&harness, collection, &ImportConfig::default());

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    monitor.run_scheduled("0 */6 * * *", shutdown).await.unwrap();
}

#[tokio::test]
async fn scheduler_rejects_invalid_schedule() {
    let harness = TestHarness::new().await.unwrap();
    let collection = collection(&harness, "https://odl.example/feed").await;
    let monitor = monitor(&harness, collection, &ImportConfig::default());

    let err = monitor
        .run_scheduled("not a schedule", CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid import schedule"));
}
