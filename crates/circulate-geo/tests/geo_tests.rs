// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Area validation backed by a live (mocked) discovery registry.

use circulate_core::problem::{REMOTE_INTEGRATION_FAILED, UNKNOWN_LOCATION};
use circulate_geo::{Gazetteer, RegistryClient, area_entries, validate_geographic_areas};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn registry_knowing(place: &str, nation: &str) -> MockServer {
    let server = MockServer::start().await;
    let area = format!(r#"{{"{nation}": "{place}"}}"#);
    Mock::given(method("GET"))
        .and(path("/coverage"))
        .and(query_param("coverage", area.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "unknown": null,
            "ambiguous": null,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coverage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"unknown": ["elsewhere"]})),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn registry_resolves_free_text_place() {
    let server = registry_knowing("Ontario", "CA").await;
    let client = RegistryClient::new(reqwest::Client::new(), vec![server.uri()]);

    let entries = area_entries(&[r#"["Ontario", "MD"]"#.to_string()]);
    let stored = validate_geographic_areas(&entries, &Gazetteer::embedded(), &client)
        .await
        .unwrap();
    assert_eq!(stored, r#"{"CA": ["Ontario"], "US": ["MD"]}"#);
}

#[tokio::test]
async fn registry_that_knows_nothing_gives_unknown_location() {
    let server = registry_knowing("Chicago", "US").await;
    let client = RegistryClient::new(reqwest::Client::new(), vec![server.uri()]);

    let problem = validate_geographic_areas(
        &["Not a real place".to_string()],
        &Gazetteer::embedded(),
        &client,
    )
    .await
    .unwrap_err();
    assert!(problem.same_type(&UNKNOWN_LOCATION));
    assert_eq!(problem.detail, "Unable to locate \"Not a real place\".");
}

#[tokio::test]
async fn unreachable_registry_gives_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = RegistryClient::new(reqwest::Client::new(), vec![server.uri()]);

    let problem = validate_geographic_areas(&["Ontario".to_string()], &Gazetteer::embedded(), &client)
        .await
        .unwrap_err();
    assert!(problem.same_type(&REMOTE_INTEGRATION_FAILED));
    assert_eq!(problem.status_code, 502);
}
