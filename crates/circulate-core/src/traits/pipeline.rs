// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The import pipeline that persists metadata extracted from feeds.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CirculateError;
use crate::metadata::Metadata;

/// Outcome of applying one publication's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedWork {
    pub id: i64,
    pub identifier: String,
    pub is_new: bool,
}

/// Applies extracted metadata to the platform's catalog.
///
/// Applying the same identifier twice replaces its circulation data
/// (licenses, formats, totals) with the newer values.
#[async_trait]
pub trait ImportPipeline: Send + Sync {
    async fn apply(&self, metadata: &Metadata) -> Result<ImportedWork, CirculateError>;
}
