// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across Circulate crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CirculateError;

/// Integration goal tags.
pub mod goals {
    /// Sitewide search index.
    pub const SEARCH: &str = "search";
    /// Discovery registries that know about service areas.
    pub const DISCOVERY: &str = "discovery";
    /// Collections whose licenses are imported from a feed.
    pub const LICENSES: &str = "licenses";
}

/// Integration protocol tags.
pub mod protocols {
    pub const ELASTICSEARCH: &str = "Elasticsearch";
    pub const OPDS_REGISTRATION: &str = "OPDS Registration";
    pub const ODL2: &str = "ODL + OPDS 2.x";
}

/// Health status reported by a service adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// A library managed by this circulation platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: i64,
    pub uuid: String,
    pub short_name: String,
    pub name: String,
}

/// Data written when a library is created or edited.
///
/// A setting with value `None` is removed.
#[derive(Debug, Clone, Default)]
pub struct LibraryWrite {
    pub uuid: String,
    pub short_name: String,
    pub name: String,
    pub settings: Vec<(String, Option<String>)>,
}

/// A configured external service with its keyed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIntegration {
    pub id: i64,
    pub protocol: String,
    pub goal: String,
    pub name: Option<String>,
    pub settings: BTreeMap<String, String>,
}

impl ExternalIntegration {
    /// Setting key holding the integration's base URL.
    pub const URL: &'static str = "url";

    /// Returns the value of a setting, if present.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Returns the integration's base URL, if configured.
    pub fn url(&self) -> Option<&str> {
        self.setting(Self::URL)
    }
}

/// Data written when an integration is created or edited.
#[derive(Debug, Clone, Default)]
pub struct IntegrationWrite {
    pub protocol: String,
    pub goal: String,
    pub name: Option<String>,
    pub settings: Vec<(String, Option<String>)>,
}

/// Roles an admin can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdminRole {
    #[strum(serialize = "system")]
    #[serde(rename = "system")]
    SystemAdmin,
    #[strum(serialize = "manager-all")]
    #[serde(rename = "manager-all")]
    SitewideLibraryManager,
    #[strum(serialize = "librarian-all")]
    #[serde(rename = "librarian-all")]
    SitewideLibrarian,
    #[strum(serialize = "manager")]
    #[serde(rename = "manager")]
    LibraryManager,
    #[strum(serialize = "librarian")]
    #[serde(rename = "librarian")]
    Librarian,
}

impl AdminRole {
    /// True for roles that must be scoped to a single library.
    pub fn is_library_scoped(self) -> bool {
        matches!(self, AdminRole::LibraryManager | AdminRole::Librarian)
    }
}

/// A role held by an admin, optionally scoped to a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: AdminRole,
    pub library_id: Option<i64>,
}

/// An authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub roles: Vec<RoleGrant>,
}

impl Admin {
    fn has(&self, role: AdminRole, library_id: Option<i64>) -> bool {
        self.roles
            .iter()
            .any(|grant| grant.role == role && grant.library_id == library_id)
    }

    pub fn is_system_admin(&self) -> bool {
        self.has(AdminRole::SystemAdmin, None)
    }

    pub fn is_sitewide_library_manager(&self) -> bool {
        self.is_system_admin() || self.has(AdminRole::SitewideLibraryManager, None)
    }

    pub fn is_sitewide_librarian(&self) -> bool {
        self.is_sitewide_library_manager() || self.has(AdminRole::SitewideLibrarian, None)
    }

    pub fn is_library_manager(&self, library_id: i64) -> bool {
        self.is_sitewide_library_manager() || self.has(AdminRole::LibraryManager, Some(library_id))
    }

    pub fn is_librarian(&self, library_id: i64) -> bool {
        self.is_library_manager(library_id)
            || self.is_sitewide_librarian()
            || self.has(AdminRole::Librarian, Some(library_id))
    }

    pub fn require_system_admin(&self) -> Result<(), CirculateError> {
        if self.is_system_admin() {
            Ok(())
        } else {
            Err(CirculateError::AdminNotAuthorized(format!(
                "{} is not a system admin",
                self.email
            )))
        }
    }

    pub fn require_library_manager(&self, library: &Library) -> Result<(), CirculateError> {
        if self.is_library_manager(library.id) {
            Ok(())
        } else {
            Err(CirculateError::AdminNotAuthorized(format!(
                "{} is not a library manager for {}",
                self.email, library.short_name
            )))
        }
    }
}

/// A persisted lane in a library's browse hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub id: i64,
    pub library_id: i64,
    pub parent_id: Option<i64>,
    pub display_name: String,
    pub languages: Vec<String>,
    pub priority: i64,
}

/// A lane to be written, with its sublanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneSpec {
    pub display_name: String,
    pub languages: Vec<String>,
    pub children: Vec<LaneSpec>,
}

/// Nations recognized by geographic service areas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum Nation {
    US,
    CA,
}

impl Nation {
    /// Nations in the order they are asked about.
    pub const ALL: [Nation; 2] = [Nation::US, Nation::CA];
}

/// A record of one run of a monitor service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub service: String,
    pub collection_id: Option<i64>,
    pub start: String,
    pub finish: Option<String>,
    pub counter: Option<i64>,
    pub exception: Option<String>,
}

/// Returns the current UTC time in the storage timestamp format.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
