// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary storage with seed helpers.

use std::sync::Arc;

use circulate_config::CirculateConfig;
use circulate_config::model::StorageConfig;
use circulate_core::types::{AdminRole, IntegrationWrite, LibraryWrite, RoleGrant};
use circulate_core::{Admin, CirculateError, ExternalIntegration, Library, StorageAdapter};
use circulate_storage::SqliteStorage;
use circulate_storage::queries::admins::hash_token;
use tempfile::TempDir;

/// A fresh, migrated SQLite database in a temporary directory.
///
/// The directory is removed when the harness is dropped.
pub struct TestHarness {
    _dir: TempDir,
    config: CirculateConfig,
    storage: Arc<SqliteStorage>,
}

impl TestHarness {
    pub async fn new() -> Result<Self, CirculateError> {
        let dir = TempDir::new().map_err(CirculateError::storage)?;
        let db_path = dir.path().join("test.db").to_string_lossy().to_string();

        let config = CirculateConfig {
            storage: StorageConfig {
                database_path: db_path,
                wal_mode: true,
            },
            ..CirculateConfig::default()
        };
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;

        Ok(Self {
            _dir: dir,
            config,
            storage: Arc::new(storage),
        })
    }

    /// Configuration pointing at the harness database.
    pub fn config(&self) -> &CirculateConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<SqliteStorage> {
        Arc::clone(&self.storage)
    }

    /// Creates a library with the given short name and no settings.
    pub async fn add_library(&self, short_name: &str) -> Result<Library, CirculateError> {
        self.add_library_with_settings(short_name, &[]).await
    }

    pub async fn add_library_with_settings(
        &self,
        short_name: &str,
        settings: &[(&str, &str)],
    ) -> Result<Library, CirculateError> {
        let write = LibraryWrite {
            uuid: uuid::Uuid::new_v4().to_string(),
            short_name: short_name.to_string(),
            name: format!("{short_name} library"),
            settings: settings
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
        };
        self.storage.create_library(&write).await
    }

    /// Creates an admin and returns it with its plaintext API token.
    pub async fn add_admin(
        &self,
        email: &str,
        roles: &[RoleGrant],
    ) -> Result<(Admin, String), CirculateError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let admin = self
            .storage
            .create_admin(email, &hash_token(&token), roles)
            .await?;
        Ok((admin, token))
    }

    pub async fn add_system_admin(&self) -> Result<(Admin, String), CirculateError> {
        self.add_admin(
            "sysadmin@example.com",
            &[RoleGrant {
                role: AdminRole::SystemAdmin,
                library_id: None,
            }],
        )
        .await
    }

    pub async fn add_integration(
        &self,
        protocol: &str,
        goal: &str,
        name: Option<&str>,
        settings: &[(&str, &str)],
    ) -> Result<ExternalIntegration, CirculateError> {
        let write = IntegrationWrite {
            protocol: protocol.to_string(),
            goal: goal.to_string(),
            name: name.map(str::to_string),
            settings: settings
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
        };
        self.storage.create_integration(&write).await
    }
}
