// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied on
//! every [`crate::Database::open`].

use circulate_core::CirculateError;
use tracing::info;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Applied versions are tracked by refinery in
/// `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), CirculateError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(CirculateError::storage)?;
    for migration in report.applied_migrations() {
        info!(version = migration.version(), name = %migration.name(), "applied migration");
    }
    Ok(())
}
