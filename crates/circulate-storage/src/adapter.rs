// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and import pipeline traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use circulate_config::model::StorageConfig;
use circulate_core::metadata::Metadata;
use circulate_core::{
    CirculateError, HealthStatus, ImportPipeline, ImportedWork, ServiceAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::models::{
    Admin, ExternalIntegration, IntegrationWrite, Lane, LaneSpec, Library, LibraryWrite,
    RoleGrant, StoredWork, Timestamp,
};
use crate::queries;

/// SQLite-backed storage.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other call
/// fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, CirculateError> {
        self.db.get().ok_or_else(|| CirculateError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// A previously imported work, looked up by data source and identifier.
    pub async fn work(
        &self,
        data_source: &str,
        identifier: &str,
    ) -> Result<Option<StoredWork>, CirculateError> {
        queries::catalog::get_work(self.db()?, data_source, identifier).await
    }
}

#[async_trait]
impl ServiceAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, CirculateError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), CirculateError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CirculateError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CirculateError> {
        if self.config.wal_mode {
            self.db()?.checkpoint().await?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }

    // --- Libraries ---

    async fn list_libraries(&self) -> Result<Vec<Library>, CirculateError> {
        queries::libraries::list_libraries(self.db()?).await
    }

    async fn get_library_by_uuid(&self, uuid: &str) -> Result<Option<Library>, CirculateError> {
        queries::libraries::get_library_by_uuid(self.db()?, uuid).await
    }

    async fn get_library_by_short_name(
        &self,
        short_name: &str,
    ) -> Result<Option<Library>, CirculateError> {
        queries::libraries::get_library_by_short_name(self.db()?, short_name).await
    }

    async fn create_library(&self, write: &LibraryWrite) -> Result<Library, CirculateError> {
        queries::libraries::create_library(self.db()?, write).await
    }

    async fn update_library(
        &self,
        id: i64,
        write: &LibraryWrite,
    ) -> Result<Library, CirculateError> {
        queries::libraries::update_library(self.db()?, id, write).await
    }

    async fn delete_library(&self, id: i64) -> Result<(), CirculateError> {
        queries::libraries::delete_library(self.db()?, id).await
    }

    async fn library_settings(
        &self,
        library_id: i64,
    ) -> Result<BTreeMap<String, String>, CirculateError> {
        queries::settings::library_settings(self.db()?, library_id).await
    }

    async fn set_library_setting(
        &self,
        library_id: i64,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), CirculateError> {
        queries::settings::set_library_setting(self.db()?, library_id, key, value).await
    }

    // --- Integrations ---

    async fn list_integrations(
        &self,
        goal: Option<&str>,
    ) -> Result<Vec<ExternalIntegration>, CirculateError> {
        queries::integrations::list_integrations(self.db()?, goal).await
    }

    async fn integrations_for(
        &self,
        protocol: &str,
        goal: &str,
    ) -> Result<Vec<ExternalIntegration>, CirculateError> {
        queries::integrations::integrations_for(self.db()?, protocol, goal).await
    }

    async fn get_integration(
        &self,
        id: i64,
    ) -> Result<Option<ExternalIntegration>, CirculateError> {
        queries::integrations::get_integration(self.db()?, id).await
    }

    async fn find_integration_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ExternalIntegration>, CirculateError> {
        queries::integrations::find_integration_by_name(self.db()?, name).await
    }

    async fn create_integration(
        &self,
        write: &IntegrationWrite,
    ) -> Result<ExternalIntegration, CirculateError> {
        queries::integrations::create_integration(self.db()?, write).await
    }

    async fn update_integration(
        &self,
        id: i64,
        write: &IntegrationWrite,
    ) -> Result<ExternalIntegration, CirculateError> {
        queries::integrations::update_integration(self.db()?, id, write).await
    }

    async fn delete_integration(&self, id: i64) -> Result<(), CirculateError> {
        queries::integrations::delete_integration(self.db()?, id).await
    }

    // --- Admins ---

    async fn create_admin(
        &self,
        email: &str,
        token_hash: &str,
        roles: &[RoleGrant],
    ) -> Result<Admin, CirculateError> {
        queries::admins::create_admin(self.db()?, email, token_hash, roles).await
    }

    async fn admin_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Admin>, CirculateError> {
        queries::admins::admin_by_token_hash(self.db()?, token_hash).await
    }

    // --- Lanes ---

    async fn replace_lanes(
        &self,
        library_id: i64,
        lanes: &[LaneSpec],
    ) -> Result<(), CirculateError> {
        queries::lanes::replace_lanes(self.db()?, library_id, lanes).await
    }

    async fn lanes(&self, library_id: i64) -> Result<Vec<Lane>, CirculateError> {
        queries::lanes::lanes(self.db()?, library_id).await
    }

    // --- Timestamps ---

    async fn record_timestamp(&self, timestamp: &Timestamp) -> Result<(), CirculateError> {
        queries::timestamps::record_timestamp(self.db()?, timestamp).await
    }

    async fn latest_timestamp(
        &self,
        service: &str,
        collection_id: Option<i64>,
    ) -> Result<Option<Timestamp>, CirculateError> {
        queries::timestamps::latest_timestamp(self.db()?, service, collection_id).await
    }
}

#[async_trait]
impl ImportPipeline for SqliteStorage {
    async fn apply(&self, metadata: &Metadata) -> Result<ImportedWork, CirculateError> {
        let imported = queries::catalog::apply_metadata(self.db()?, metadata).await?;
        debug!(
            identifier = %imported.identifier,
            is_new = imported.is_new,
            "work imported"
        );
        Ok(imported)
    }
}
