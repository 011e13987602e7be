// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-level models.
//!
//! Domain types live in `circulate-core` and are re-exported here; this module
//! adds the rows that only storage callers read back.

pub use circulate_core::types::{
    Admin, ExternalIntegration, IntegrationWrite, Lane, LaneSpec, Library, LibraryWrite,
    RoleGrant, Timestamp,
};

use serde::{Deserialize, Serialize};

/// An imported work as persisted, with counts of its licenses and formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWork {
    pub id: i64,
    pub data_source: String,
    pub identifier: String,
    pub title: Option<String>,
    pub medium: Option<String>,
    pub language: Option<String>,
    pub licenses_owned: i64,
    pub licenses_available: i64,
    pub license_count: i64,
    pub format_count: i64,
}
