// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `circulate import` and `circulate monitor` commands.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use circulate_config::CirculateConfig;
use circulate_core::{CirculateError, StorageAdapter};
use circulate_core::types::Timestamp;
use circulate_odl::{Odl2ImportMonitor, collection_monitors, run_scheduled};
use circulate_storage::SqliteStorage;
use tracing::{info, warn};

use crate::context;
use crate::shutdown;

/// Results of a one-off import of every selected collection.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub runs: Vec<Timestamp>,
    /// Collections whose run could not be recorded.
    pub unrecorded: Vec<i64>,
}

impl ImportSummary {
    pub fn failed(&self) -> usize {
        self.runs.iter().filter(|run| run.exception.is_some()).count()
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.runs.is_empty() && self.unrecorded.is_empty() {
            return write!(f, "no ODL 2.x collections to import");
        }
        for run in &self.runs {
            let collection = run.collection_id.unwrap_or_default();
            let imported = run.counter.unwrap_or_default();
            match &run.exception {
                None => writeln!(f, "collection {collection}: imported {imported}")?,
                Some(e) => {
                    writeln!(f, "collection {collection}: imported {imported}, failed: {e}")?
                }
            }
        }
        for collection in &self.unrecorded {
            writeln!(f, "collection {collection}: run not recorded")?;
        }
        write!(f, "{} run(s), {} failed", self.runs.len(), self.failed())
    }
}

async fn monitors(
    config: &CirculateConfig,
    storage: Arc<SqliteStorage>,
) -> Result<Vec<Odl2ImportMonitor>, CirculateError> {
    collection_monitors(storage.clone(), storage, &config.import).await
}

/// Awaits each collection's run in order. A run that cannot be recorded is
/// logged and the remaining collections still run.
async fn collect_runs<I, F>(runs: I) -> ImportSummary
where
    I: IntoIterator<Item = (i64, F)>,
    F: Future<Output = Result<Timestamp, CirculateError>>,
{
    let mut summary = ImportSummary::default();
    for (collection, run) in runs {
        match run.await {
            Ok(timestamp) => summary.runs.push(timestamp),
            Err(e) => {
                warn!(collection, error = %e, "import run could not be recorded");
                summary.unrecorded.push(collection);
            }
        }
    }
    summary
}

/// Imports every ODL 2.x collection once, or only `collection` when given.
pub async fn run_import(
    config: &CirculateConfig,
    collection: Option<i64>,
) -> Result<ImportSummary, CirculateError> {
    let storage = context::open_storage(config).await?;
    let mut selected = monitors(config, storage.clone()).await?;
    if let Some(id) = collection {
        selected.retain(|monitor| monitor.collection().id == id);
        if selected.is_empty() {
            return Err(CirculateError::NotFound {
                kind: "collection".into(),
                id: id.to_string(),
            });
        }
    }

    let summary = collect_runs(
        selected
            .iter()
            .map(|monitor| (monitor.collection().id, monitor.run_once())),
    )
    .await;
    info!(
        runs = summary.runs.len(),
        failed = summary.failed(),
        unrecorded = summary.unrecorded.len(),
        "import finished"
    );

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    Ok(summary)
}

/// Runs the import monitor on `import.schedule` until SIGINT or SIGTERM.
pub async fn run_monitor(config: CirculateConfig) -> Result<(), CirculateError> {
    let storage = context::open_storage(&config).await?;
    let monitors = monitors(&config, storage.clone()).await?;
    if monitors.is_empty() {
        warn!("no ODL 2.x collections configured; the monitor will idle");
    }

    let cancel = shutdown::install_signal_handler();
    let result = run_scheduled(&monitors, &config.import.schedule, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    result
}
