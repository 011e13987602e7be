// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The importer seam shared by the OPDS2 and ODL2 importers.

use async_trait::async_trait;
use circulate_core::metadata::Metadata;
use circulate_core::{CirculateError, ImportPipeline, ImportedWork};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feed::{self, Feed, Publication, raw_identifier};

/// Outcome of importing one feed page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<ImportedWork>,
    /// `(identifier, reason)` for publications that could not be imported.
    pub failures: Vec<(String, String)>,
    /// The feed's `next` page link.
    pub next: Option<String>,
}

/// Turns feed publications into catalog metadata.
#[async_trait]
pub trait FeedImporter: Send + Sync {
    /// Name of the data source credited for imported works.
    fn data_source(&self) -> &str;

    /// Extracts one publication's metadata.
    async fn extract_publication_metadata(
        &self,
        feed: &Feed,
        publication: &Publication,
        data_source: &str,
    ) -> Result<Metadata, CirculateError>;

    /// Parses a feed page and hands every publication to the pipeline.
    ///
    /// A publication that fails extraction or persistence is recorded in the
    /// report and does not stop the rest of the page.
    async fn import_from_feed(
        &self,
        text: &str,
        pipeline: &dyn ImportPipeline,
    ) -> Result<ImportReport, CirculateError> {
        let feed = feed::parse_feed(text).map_err(|e| CirculateError::Feed {
            message: format!("invalid OPDS2 feed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut report = ImportReport {
            next: feed.next_link().map(str::to_string),
            ..ImportReport::default()
        };

        for (index, raw) in feed.publications.iter().enumerate() {
            let label = raw_identifier(raw)
                .map(str::to_string)
                .unwrap_or_else(|| format!("publication #{index}"));

            let outcome = match Publication::deserialize(raw) {
                Ok(publication) => {
                    match self
                        .extract_publication_metadata(&feed, &publication, self.data_source())
                        .await
                    {
                        Ok(metadata) => pipeline.apply(&metadata).await,
                        Err(e) => Err(e),
                    }
                }
                Err(e) => Err(CirculateError::Feed {
                    message: format!("invalid publication: {e}"),
                    source: Some(Box::new(e)),
                }),
            };

            match outcome {
                Ok(work) => {
                    debug!(identifier = %work.identifier, is_new = work.is_new, "imported publication");
                    report.imported.push(work);
                }
                Err(e) => {
                    warn!(identifier = %label, error = %e, "failed to import publication");
                    report.failures.push((label, e.to_string()));
                }
            }
        }

        info!(
            data_source = self.data_source(),
            imported = report.imported.len(),
            failed = report.failures.len(),
            "feed page imported"
        );
        Ok(report)
    }
}
