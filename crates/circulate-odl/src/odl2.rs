// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ODL 2.x importer.
//!
//! Builds on [`Opds2Importer`] and adds license, format, and availability
//! data read from each publication's ODL licenses. A license's `self` link
//! points at its status document, which is fetched for checkout counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use circulate_core::CirculateError;
use circulate_core::metadata::{FormatData, LicenseData, Medium, Metadata, rights};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::feed::{Feed, License, Publication, as_count, first_by_rel, rels};
use crate::importer::FeedImporter;
use crate::opds2::Opds2Importer;

/// Protocol name of ODL 2.x collections.
pub const PROTOCOL: &str = circulate_core::types::protocols::ODL2;

const LICENSE_STATUS_TYPE: &str = "application/vnd.odl.info+json";

/// Extracts license and availability data from ODL 2.x publications.
#[derive(Debug, Clone)]
pub struct Odl2Importer {
    opds2: Opds2Importer,
    http: reqwest::Client,
}

/// What one license contributes to the publication's circulation data.
struct LicenseExtract {
    license: LicenseData,
    formats: Vec<FormatData>,
    medium: Option<Medium>,
    available: Option<i64>,
}

impl Odl2Importer {
    pub fn new(data_source: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            opds2: Opds2Importer::new(data_source),
            http,
        }
    }

    async fn extract_license(&self, license: &License) -> LicenseExtract {
        let meta = &license.metadata;
        let format = meta.format.first().cloned();

        // Formats are only known for licenses that declare their protection.
        let drm_schemes: Vec<Option<String>> = match &meta.protection {
            Some(protection) if !protection.format.is_empty() => {
                protection.format.iter().cloned().map(Some).collect()
            }
            Some(_) => vec![None],
            None => Vec::new(),
        };
        let formats = drm_schemes
            .into_iter()
            .map(|drm_scheme| FormatData {
                content_type: format.clone(),
                drm_scheme,
                rights_uri: rights::IN_COPYRIGHT.to_string(),
            })
            .collect();

        let checkout_url = first_by_rel(&license.links, rels::BORROW)
            .or_else(|| first_by_rel(&license.links, "borrow"))
            .map(|link| link.href.clone());
        let status_url = first_by_rel(&license.links, rels::SELF).map(|link| link.href.clone());

        let mut remaining_checkouts = None;
        let mut available = None;
        if let Some(url) = &status_url {
            if let Some(status) = self.fetch_license_status(url).await {
                let checkouts = status.get("checkouts");
                remaining_checkouts = as_count(checkouts.and_then(|c| c.get("left")));
                available = as_count(checkouts.and_then(|c| c.get("available")));
            }
        }

        let (expires, concurrent_checkouts) = match &meta.terms {
            Some(terms) => (
                terms
                    .expires
                    .as_deref()
                    .and_then(|raw| parse_expiry(&meta.identifier, raw)),
                as_count(terms.concurrency.as_ref()),
            ),
            None => (None, None),
        };

        LicenseExtract {
            license: LicenseData {
                identifier: meta.identifier.clone(),
                checkout_url,
                status_url,
                expires,
                remaining_checkouts,
                concurrent_checkouts,
            },
            formats,
            medium: format.as_deref().and_then(Medium::from_media_type),
            available,
        }
    }

    /// Fetches a license status document. Any failure is logged and treated
    /// as no status.
    async fn fetch_license_status(&self, url: &str) -> Option<Value> {
        let response = match self.http.get(url).header(ACCEPT, LICENSE_STATUS_TYPE).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "license status request failed");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = %status, "license status request returned an error");
            return None;
        }
        match response.json::<Value>().await {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(url, error = %e, "license status document is not JSON");
                None
            }
        }
    }
}

/// Adds a feed-supplied count to a total, ignoring negatives and saturating.
fn add_count(total: i64, count: Option<i64>) -> i64 {
    total.saturating_add(count.unwrap_or(0).max(0))
}

fn parse_expiry(license: &str, raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(expires) => Some(expires.with_timezone(&Utc)),
        Err(e) => {
            warn!(license, expires = raw, error = %e, "ignoring malformed license expiry");
            None
        }
    }
}

#[async_trait]
impl FeedImporter for Odl2Importer {
    fn data_source(&self) -> &str {
        self.opds2.data_source()
    }

    async fn extract_publication_metadata(
        &self,
        _feed: &Feed,
        publication: &Publication,
        data_source: &str,
    ) -> Result<Metadata, CirculateError> {
        let mut metadata = self.opds2.extract(publication, data_source)?;

        let mut licenses = Vec::with_capacity(publication.licenses.len());
        let mut formats: Vec<FormatData> = Vec::new();
        let mut medium = None;
        let mut licenses_owned = 0;
        let mut licenses_available = 0;

        for license in &publication.licenses {
            let extract = self.extract_license(license).await;
            if medium.is_none() {
                medium = extract.medium;
            }
            for format in extract.formats {
                if !formats.contains(&format) {
                    formats.push(format);
                }
            }
            licenses_owned = add_count(licenses_owned, extract.license.concurrent_checkouts);
            licenses_available = add_count(licenses_available, extract.available);
            licenses.push(extract.license);
        }

        debug!(
            identifier = %metadata.primary_identifier,
            licenses = licenses.len(),
            licenses_owned,
            licenses_available,
            "extracted ODL licenses"
        );

        if medium.is_some() {
            metadata.medium = medium;
        }
        let circulation = &mut metadata.circulation;
        circulation.licenses_owned = licenses_owned;
        circulation.licenses_available = licenses_available;
        circulation.licenses = licenses;
        for format in formats {
            if !circulation.formats.contains(&format) {
                circulation.formats.push(format);
            }
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn extract_from_value(
        importer: &Odl2Importer,
        publication: Value,
    ) -> Result<Metadata, CirculateError> {
        let publication: Publication = serde_json::from_value(publication).unwrap();
        importer
            .extract_publication_metadata(&Feed::default(), &publication, importer.data_source())
            .await
    }

    fn importer() -> Odl2Importer {
        Odl2Importer::new("ODL Feed", reqwest::Client::new())
    }

    async fn status_endpoint(server: &MockServer, route: &str, body: Value) -> String {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
        format!("{}{route}", server.uri())
    }

    #[tokio::test]
    async fn totals_sum_concurrency_and_available() {
        let server = MockServer::start().await;
        let status_a = status_endpoint(
            &server,
            "/licenses/a/status",
            json!({"checkouts": {"left": 30, "available": 2}}),
        )
        .await;
        let status_b = status_endpoint(
            &server,
            "/licenses/b/status",
            json!({"checkouts": {"left": 10, "available": 1}}),
        )
        .await;

        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:1", "title": "Two Licenses"},
                "licenses": [
                    {
                        "metadata": {
                            "identifier": "a",
                            "format": ["application/epub+zip"],
                            "terms": {"concurrency": 3, "expires": "2030-06-01T00:00:00+00:00"},
                            "protection": {"format": ["application/vnd.adobe.adept+xml"]}
                        },
                        "links": [
                            {"rel": "http://opds-spec.org/acquisition/borrow", "href": "https://odl/borrow/a"},
                            {"rel": "self", "href": status_a}
                        ]
                    },
                    {
                        "metadata": {
                            "identifier": "b",
                            "format": "application/epub+zip",
                            "terms": {"concurrency": 1},
                            "protection": {"format": ["application/vnd.adobe.adept+xml"]}
                        },
                        "links": [{"rel": "self", "href": status_b}]
                    }
                ]
            }),
        )
        .await
        .unwrap();

        let circulation = &metadata.circulation;
        assert_eq!(circulation.licenses_owned, 4);
        assert_eq!(circulation.licenses_available, 3);
        assert_eq!(circulation.licenses.len(), 2);
        assert_eq!(circulation.licenses[0].remaining_checkouts, Some(30));
        assert_eq!(
            circulation.licenses[0].checkout_url.as_deref(),
            Some("https://odl/borrow/a")
        );
        assert!(circulation.licenses[0].expires.is_some());
        assert_eq!(circulation.licenses[1].checkout_url, None);
        // Both licenses share one (format, DRM) pair.
        assert_eq!(circulation.formats.len(), 1);
        assert_eq!(circulation.formats[0].rights_uri, rights::IN_COPYRIGHT);
        assert_eq!(metadata.medium, Some(Medium::Book));
    }

    #[tokio::test]
    async fn license_without_protection_adds_no_format() {
        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:2"},
                "licenses": [{
                    "metadata": {"identifier": "c", "format": ["application/audiobook+json"]}
                }]
            }),
        )
        .await
        .unwrap();

        assert!(metadata.circulation.formats.is_empty());
        assert_eq!(metadata.medium, Some(Medium::Audio));
        assert_eq!(metadata.circulation.licenses_owned, 0);
    }

    #[tokio::test]
    async fn empty_protection_gets_one_format_without_drm() {
        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:2"},
                "licenses": [{
                    "metadata": {
                        "identifier": "c",
                        "format": ["application/audiobook+json"],
                        "protection": {}
                    }
                }]
            }),
        )
        .await
        .unwrap();

        let formats = &metadata.circulation.formats;
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].drm_scheme, None);
        assert_eq!(formats[0].content_type.as_deref(), Some("application/audiobook+json"));
    }

    #[tokio::test]
    async fn huge_concurrency_saturates_instead_of_overflowing() {
        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:5"},
                "licenses": [
                    {"metadata": {"identifier": "g", "terms": {"concurrency": i64::MAX}}},
                    {"metadata": {"identifier": "h", "terms": {"concurrency": 1}}},
                    {"metadata": {"identifier": "i", "terms": {"concurrency": -7}}}
                ]
            }),
        )
        .await
        .unwrap();

        assert_eq!(metadata.circulation.licenses_owned, i64::MAX);
        assert_eq!(metadata.circulation.licenses_available, 0);
    }

    #[tokio::test]
    async fn one_format_per_drm_scheme() {
        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:3"},
                "licenses": [{
                    "metadata": {
                        "identifier": "d",
                        "format": ["application/epub+zip"],
                        "protection": {"format": [
                            "application/vnd.adobe.adept+xml",
                            "application/vnd.readium.lcp.license.v1.0+json"
                        ]}
                    }
                }]
            }),
        )
        .await
        .unwrap();
        let schemes: Vec<_> = metadata
            .circulation
            .formats
            .iter()
            .map(|f| f.drm_scheme.as_deref())
            .collect();
        assert_eq!(
            schemes,
            [
                Some("application/vnd.adobe.adept+xml"),
                Some("application/vnd.readium.lcp.license.v1.0+json")
            ]
        );
    }

    #[tokio::test]
    async fn malformed_or_failing_status_counts_as_zero() {
        let server = MockServer::start().await;
        let malformed = status_endpoint(
            &server,
            "/status/malformed",
            json!({"checkouts": {"left": "many", "available": null}}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/status/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let down = format!("{}/status/down", server.uri());

        let metadata = extract_from_value(
            &importer(),
            json!({
                "metadata": {"identifier": "urn:book:4"},
                "licenses": [
                    {"metadata": {"identifier": "e", "terms": {"concurrency": 5}},
                     "links": [{"rel": "self", "href": malformed}]},
                    {"metadata": {"identifier": "f", "terms": {"concurrency": "bad", "expires": "soon"}},
                     "links": [{"rel": "self", "href": down}]}
                ]
            }),
        )
        .await
        .unwrap();

        let circulation = &metadata.circulation;
        assert_eq!(circulation.licenses_owned, 5);
        assert_eq!(circulation.licenses_available, 0);
        assert_eq!(circulation.licenses[0].remaining_checkouts, None);
        assert_eq!(circulation.licenses[1].concurrent_checkouts, None);
        assert_eq!(circulation.licenses[1].expires, None);
        assert_eq!(
            circulation.licenses[1].status_url.as_deref(),
            Some(down.as_str())
        );
    }
}
