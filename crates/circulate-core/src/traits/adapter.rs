// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all service backends implement.

use async_trait::async_trait;

use crate::error::CirculateError;
use crate::types::HealthStatus;

/// The base trait for Circulate service backends.
///
/// Provides identity and health check capabilities used by the `/health`
/// endpoint and the `circulate` CLI.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, CirculateError>;
}
