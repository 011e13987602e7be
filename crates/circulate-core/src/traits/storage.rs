// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the relational store.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::CirculateError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{
    Admin, ExternalIntegration, IntegrationWrite, Lane, LaneSpec, Library, LibraryWrite,
    RoleGrant, Timestamp,
};

/// Adapter for the persistence backend holding libraries, configuration
/// settings, integrations, admins, lanes, and monitor timestamps.
///
/// Writes that touch a record and its settings happen in one transaction.
#[async_trait]
pub trait StorageAdapter: ServiceAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), CirculateError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), CirculateError>;

    // --- Libraries ---

    /// All libraries, ordered by id.
    async fn list_libraries(&self) -> Result<Vec<Library>, CirculateError>;
    async fn get_library_by_uuid(&self, uuid: &str) -> Result<Option<Library>, CirculateError>;
    async fn get_library_by_short_name(
        &self,
        short_name: &str,
    ) -> Result<Option<Library>, CirculateError>;
    async fn create_library(&self, write: &LibraryWrite) -> Result<Library, CirculateError>;
    async fn update_library(
        &self,
        id: i64,
        write: &LibraryWrite,
    ) -> Result<Library, CirculateError>;
    /// Deletes a library together with its settings and lanes.
    async fn delete_library(&self, id: i64) -> Result<(), CirculateError>;
    async fn library_settings(
        &self,
        library_id: i64,
    ) -> Result<BTreeMap<String, String>, CirculateError>;
    async fn set_library_setting(
        &self,
        library_id: i64,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), CirculateError>;

    // --- Integrations ---

    /// Integrations, optionally filtered by goal, ordered by id.
    async fn list_integrations(
        &self,
        goal: Option<&str>,
    ) -> Result<Vec<ExternalIntegration>, CirculateError>;
    async fn integrations_for(
        &self,
        protocol: &str,
        goal: &str,
    ) -> Result<Vec<ExternalIntegration>, CirculateError>;
    async fn get_integration(&self, id: i64)
        -> Result<Option<ExternalIntegration>, CirculateError>;
    async fn find_integration_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ExternalIntegration>, CirculateError>;
    async fn create_integration(
        &self,
        write: &IntegrationWrite,
    ) -> Result<ExternalIntegration, CirculateError>;
    async fn update_integration(
        &self,
        id: i64,
        write: &IntegrationWrite,
    ) -> Result<ExternalIntegration, CirculateError>;
    /// Deletes an integration together with its settings.
    async fn delete_integration(&self, id: i64) -> Result<(), CirculateError>;

    // --- Admins ---

    async fn create_admin(
        &self,
        email: &str,
        token_hash: &str,
        roles: &[RoleGrant],
    ) -> Result<Admin, CirculateError>;
    async fn admin_by_token_hash(&self, token_hash: &str)
        -> Result<Option<Admin>, CirculateError>;

    // --- Lanes ---

    /// Replaces a library's lanes with the given hierarchy.
    async fn replace_lanes(
        &self,
        library_id: i64,
        lanes: &[LaneSpec],
    ) -> Result<(), CirculateError>;
    async fn lanes(&self, library_id: i64) -> Result<Vec<Lane>, CirculateError>;

    // --- Timestamps ---

    async fn record_timestamp(&self, timestamp: &Timestamp) -> Result<(), CirculateError>;
    async fn latest_timestamp(
        &self,
        service: &str,
        collection_id: Option<i64>,
    ) -> Result<Option<Timestamp>, CirculateError>;
}
