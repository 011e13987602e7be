// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic import of ODL 2.x collections.
//!
//! Each run fetches a collection's feed, follows `next` links up to the
//! configured page limit, and records a [`Timestamp`] describing the run.
//! Scheduled runs happen one after another and never overlap.

use std::collections::HashSet;
use std::slice;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use circulate_config::model::ImportConfig;
use circulate_core::types::{Timestamp, goals, now_timestamp, protocols};
use circulate_core::{CirculateError, ExternalIntegration, ImportPipeline, StorageAdapter};
use croner::Cron;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::importer::FeedImporter;
use crate::odl2::Odl2Importer;

/// Service name recorded in run timestamps.
pub const SERVICE_NAME: &str = "ODL 2.x Import Monitor";

/// Collection setting naming the data source credited for imported works.
pub const DATA_SOURCE_SETTING: &str = "data_source";

const FEED_ACCEPT: &str = "application/opds+json, application/json;q=0.9";

/// Imports one ODL 2.x collection.
pub struct Odl2ImportMonitor {
    collection: ExternalIntegration,
    feed_url: String,
    importer: Odl2Importer,
    http: reqwest::Client,
    pipeline: Arc<dyn ImportPipeline>,
    storage: Arc<dyn StorageAdapter>,
    max_pages: u32,
}

impl std::fmt::Debug for Odl2ImportMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Odl2ImportMonitor")
            .field("collection", &self.collection.id)
            .field("feed_url", &self.feed_url)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl Odl2ImportMonitor {
    /// Creates a monitor for a licenses collection.
    ///
    /// The collection needs a feed URL. Its data source is the
    /// `data_source` setting, falling back to the collection name.
    pub fn new(
        collection: ExternalIntegration,
        http: reqwest::Client,
        pipeline: Arc<dyn ImportPipeline>,
        storage: Arc<dyn StorageAdapter>,
        config: &ImportConfig,
    ) -> Result<Self, CirculateError> {
        let feed_url = collection
            .url()
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CirculateError::Config(format!("collection {} has no feed url", collection.id))
            })?;
        let data_source = collection
            .setting(DATA_SOURCE_SETTING)
            .or(collection.name.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                CirculateError::Config(format!(
                    "collection {} has no {DATA_SOURCE_SETTING} setting",
                    collection.id
                ))
            })?;

        Ok(Self {
            importer: Odl2Importer::new(data_source, http.clone()),
            collection,
            feed_url,
            http,
            pipeline,
            storage,
            max_pages: config.max_pages,
        })
    }

    /// Builds the HTTP client used for feed and license status requests.
    pub fn http_client(config: &ImportConfig) -> Result<reqwest::Client, CirculateError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CirculateError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })
    }

    pub fn collection(&self) -> &ExternalIntegration {
        &self.collection
    }

    /// Runs one import of the collection and records its timestamp.
    ///
    /// Feed failures end the run early and are stored in the timestamp's
    /// exception; only a failure to record the timestamp is returned as
    /// an error.
    pub async fn run_once(&self) -> Result<Timestamp, CirculateError> {
        let start = now_timestamp();
        info!(collection = self.collection.id, url = %self.feed_url, "import run started");

        let mut imported = 0;
        let exception = match self.import_pages(&mut imported).await {
            Ok(()) => None,
            Err(e) => {
                warn!(collection = self.collection.id, error = %e, "import run failed");
                Some(e.to_string())
            }
        };

        let timestamp = Timestamp {
            service: SERVICE_NAME.to_string(),
            collection_id: Some(self.collection.id),
            start,
            finish: Some(now_timestamp()),
            counter: Some(imported),
            exception,
        };
        self.storage.record_timestamp(&timestamp).await?;
        info!(collection = self.collection.id, imported, "import run finished");
        Ok(timestamp)
    }

    async fn import_pages(&self, imported: &mut i64) -> Result<(), CirculateError> {
        let mut url = Some(self.feed_url.clone());
        let mut seen = HashSet::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            if pages >= self.max_pages {
                info!(max_pages = self.max_pages, next = %page_url, "page limit reached");
                break;
            }
            if !seen.insert(page_url.clone()) {
                warn!(url = %page_url, "feed links back to a page already imported");
                break;
            }

            let body = self.fetch_page(&page_url).await?;
            let report = self
                .importer
                .import_from_feed(&body, self.pipeline.as_ref())
                .await?;
            pages += 1;
            *imported += report.imported.len() as i64;
            debug!(
                page = pages,
                imported = report.imported.len(),
                failed = report.failures.len(),
                "feed page processed"
            );
            url = report.next;
        }
        Ok(())
    }

    async fn fetch_page(&self, url: &str) -> Result<String, CirculateError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| CirculateError::Http {
                message: format!("failed to fetch feed {url}: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CirculateError::Http {
                message: format!("feed {url} returned {status}"),
                source: None,
            });
        }
        response.text().await.map_err(|e| CirculateError::Http {
            message: format!("failed to read feed {url}: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Runs this monitor on a cron schedule until `shutdown` is cancelled.
    pub async fn run_scheduled(
        &self,
        schedule: &str,
        shutdown: CancellationToken,
    ) -> Result<(), CirculateError> {
        run_scheduled(slice::from_ref(self), schedule, shutdown).await
    }
}

/// Builds a monitor for every ODL 2.x licenses collection.
///
/// Misconfigured collections are logged and skipped.
pub async fn collection_monitors(
    storage: Arc<dyn StorageAdapter>,
    pipeline: Arc<dyn ImportPipeline>,
    config: &ImportConfig,
) -> Result<Vec<Odl2ImportMonitor>, CirculateError> {
    let http = Odl2ImportMonitor::http_client(config)?;
    let collections = storage
        .integrations_for(protocols::ODL2, goals::LICENSES)
        .await?;

    let mut monitors = Vec::with_capacity(collections.len());
    for collection in collections {
        let id = collection.id;
        match Odl2ImportMonitor::new(
            collection,
            http.clone(),
            Arc::clone(&pipeline),
            Arc::clone(&storage),
            config,
        ) {
            Ok(monitor) => monitors.push(monitor),
            Err(e) => warn!(collection = id, error = %e, "skipping collection"),
        }
    }
    Ok(monitors)
}

/// Runs every monitor in turn at each tick of `schedule` until `shutdown`
/// is cancelled.
pub async fn run_scheduled(
    monitors: &[Odl2ImportMonitor],
    schedule: &str,
    shutdown: CancellationToken,
) -> Result<(), CirculateError> {
    let cron: Cron = schedule.parse().map_err(|e| {
        CirculateError::Config(format!("invalid import schedule {schedule:?}: {e}"))
    })?;
    info!(schedule, collections = monitors.len(), "import scheduler started");

    loop {
        let now = Utc::now();
        let next = cron.find_next_occurrence(&now, false).map_err(|e| {
            CirculateError::Config(format!("import schedule {schedule:?} has no next run: {e}"))
        })?;
        let wait = (next - now).to_std().unwrap_or_default();
        debug!(next = %next, "next import run scheduled");

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("import scheduler shutting down");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }

        for monitor in monitors {
            if shutdown.is_cancelled() {
                break;
            }
            if let Err(e) = monitor.run_once().await {
                error!(collection = monitor.collection.id, error = %e, "failed to record import run");
            }
        }
    }
}
