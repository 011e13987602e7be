// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the coverage endpoint of discovery registries.
//!
//! A registry is asked whether it can place a service area. Each configured
//! registry is tried in priority order until one recognizes the area.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use circulate_core::problem::REMOTE_INTEGRATION_FAILED;
use circulate_core::{CirculateError, ExternalIntegration, Nation, PlaceLookup, ProblemDetail};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Body returned by a registry's coverage endpoint.
#[derive(Debug, Deserialize)]
struct CoverageResponse {
    #[serde(default)]
    unknown: Option<Value>,
    #[serde(default)]
    ambiguous: Option<Value>,
}

impl CoverageResponse {
    fn is_match(&self) -> bool {
        is_blank(self.unknown.as_ref()) && is_blank(self.ambiguous.as_ref())
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Asks discovery registries whether they can locate a place.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    registries: Vec<String>,
}

impl RegistryClient {
    /// Creates a client for the given registry base URLs, in priority order.
    pub fn new(http: reqwest::Client, registries: Vec<String>) -> Self {
        Self { http, registries }
    }

    /// Creates a client from discovery integrations, ordered by id.
    ///
    /// Integrations without a URL are skipped.
    pub fn from_integrations(http: reqwest::Client, integrations: &[ExternalIntegration]) -> Self {
        let mut sorted: Vec<&ExternalIntegration> = integrations.iter().collect();
        sorted.sort_by_key(|integration| integration.id);
        let registries = sorted
            .into_iter()
            .filter_map(|integration| match integration.url() {
                Some(url) => Some(url.to_string()),
                None => {
                    warn!(id = integration.id, "discovery integration has no url, skipping");
                    None
                }
            })
            .collect();
        Self::new(http, registries)
    }

    /// Builds the HTTP client used for coverage requests.
    pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, CirculateError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CirculateError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Registry base URLs, in the order they are asked.
    pub fn registries(&self) -> &[String] {
        &self.registries
    }

    /// Asks each registry about a service area until one recognizes it.
    ///
    /// Returns `Ok(true)` on the first registry that places the area without
    /// unknown or ambiguous parts, and `Ok(false)` when every registry answered
    /// but none matched. If no registry matched and at least one could not be
    /// reached, returns a remote-integration problem naming the first
    /// registry that failed.
    pub async fn ask_registry(&self, service_area: &str) -> Result<bool, ProblemDetail> {
        let mut first_failure: Option<&str> = None;

        for base in &self.registries {
            match self.ask_one(base, service_area).await {
                Ok(true) => {
                    debug!(registry = %base, service_area, "registry recognized service area");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(registry = %base, error = %e, "coverage request failed");
                    first_failure.get_or_insert(base.as_str());
                }
            }
        }

        match first_failure {
            Some(url) => Err(REMOTE_INTEGRATION_FAILED
                .with_detail(format!("Unable to contact the registry at {url}."))),
            None => Ok(false),
        }
    }

    async fn ask_one(&self, base: &str, service_area: &str) -> Result<bool, CirculateError> {
        let url = coverage_url(base, service_area)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CirculateError::Http {
                message: format!("coverage request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CirculateError::Http {
                message: format!("registry returned {status}"),
                source: None,
            });
        }

        let coverage: CoverageResponse =
            response.json().await.map_err(|e| CirculateError::Http {
                message: format!("failed to parse coverage response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(coverage.is_match())
    }

    /// Asks the registries about a place as a U.S. area, then as a Canadian one.
    pub async fn find_location_through_registry(
        &self,
        place: &str,
    ) -> Result<Option<Nation>, ProblemDetail> {
        for nation in Nation::ALL {
            let service_area = service_area_json(nation, place);
            if self.ask_registry(&service_area).await? {
                return Ok(Some(nation));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl PlaceLookup for RegistryClient {
    async fn find_location(&self, place: &str) -> Result<Option<Nation>, ProblemDetail> {
        self.find_location_through_registry(place).await
    }
}

/// Formats `{"<NATION>": "<place>"}`.
pub fn service_area_json(nation: Nation, place: &str) -> String {
    let mut area = BTreeMap::new();
    area.insert(nation.to_string(), place);
    // Serializing a map of strings cannot fail.
    circulate_core::json::to_spaced_string(&area).unwrap_or_default()
}

fn coverage_url(base: &str, service_area: &str) -> Result<Url, CirculateError> {
    let mut url = Url::parse(&format!("{}/coverage", base.trim_end_matches('/'))).map_err(|e| {
        CirculateError::Http {
            message: format!("invalid registry url {base}: {e}"),
            source: Some(Box::new(e)),
        }
    })?;
    url.query_pairs_mut().append_pair("coverage", service_area);
    Ok(url)
}
