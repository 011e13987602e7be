// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External integration CRUD operations.

use circulate_core::CirculateError;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::database::Database;
use crate::models::{ExternalIntegration, IntegrationWrite};
use crate::queries::settings::{Scope, load_settings, write_settings};

const COLUMNS: &str = "id, protocol, goal, name";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ExternalIntegration> {
    Ok(ExternalIntegration {
        id: row.get(0)?,
        protocol: row.get(1)?,
        goal: row.get(2)?,
        name: row.get(3)?,
        settings: Default::default(),
    })
}

/// Run a query returning integration rows and attach each one's settings.
fn query_with_settings(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<ExternalIntegration>> {
    let mut stmt = conn.prepare(sql)?;
    let mut integrations = stmt
        .query_map(params, from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    for integration in &mut integrations {
        integration.settings = load_settings(conn, Scope::Integration(integration.id))?;
    }
    Ok(integrations)
}

fn get_with_settings(conn: &Connection, id: i64) -> rusqlite::Result<Option<ExternalIntegration>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM external_integrations WHERE id = ?1"),
            params![id],
            from_row,
        )
        .optional()?;
    match found {
        Some(mut integration) => {
            integration.settings = load_settings(conn, Scope::Integration(id))?;
            Ok(Some(integration))
        }
        None => Ok(None),
    }
}

/// Integrations ordered by id, optionally restricted to one goal.
pub async fn list_integrations(
    db: &Database,
    goal: Option<&str>,
) -> Result<Vec<ExternalIntegration>, CirculateError> {
    let goal = goal.map(str::to_string);
    db.connection()
        .call(move |conn| match goal {
            Some(goal) => query_with_settings(
                conn,
                &format!("SELECT {COLUMNS} FROM external_integrations WHERE goal = ?1 ORDER BY id"),
                params![goal],
            ),
            None => query_with_settings(
                conn,
                &format!("SELECT {COLUMNS} FROM external_integrations ORDER BY id"),
                [],
            ),
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn integrations_for(
    db: &Database,
    protocol: &str,
    goal: &str,
) -> Result<Vec<ExternalIntegration>, CirculateError> {
    let protocol = protocol.to_string();
    let goal = goal.to_string();
    db.connection()
        .call(move |conn| {
            query_with_settings(
                conn,
                &format!(
                    "SELECT {COLUMNS} FROM external_integrations
                     WHERE protocol = ?1 AND goal = ?2 ORDER BY id"
                ),
                params![protocol, goal],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_integration(
    db: &Database,
    id: i64,
) -> Result<Option<ExternalIntegration>, CirculateError> {
    db.connection()
        .call(move |conn| get_with_settings(conn, id))
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn find_integration_by_name(
    db: &Database,
    name: &str,
) -> Result<Option<ExternalIntegration>, CirculateError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let id: Option<i64> = conn
                .query_row(
                    "SELECT id FROM external_integrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            match id {
                Some(id) => get_with_settings(conn, id),
                None => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert an integration and its settings in one transaction.
pub async fn create_integration(
    db: &Database,
    write: &IntegrationWrite,
) -> Result<ExternalIntegration, CirculateError> {
    let write = write.clone();
    let created = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO external_integrations (protocol, goal, name) VALUES (?1, ?2, ?3)",
                params![write.protocol, write.goal, write.name],
            )?;
            let id = tx.last_insert_rowid();
            write_settings(&tx, Scope::Integration(id), &write.settings)?;
            let created = get_with_settings(&tx, id)?;
            tx.commit()?;
            Ok(created)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    created.ok_or_else(|| CirculateError::Internal("created integration vanished".into()))
}

/// Update an integration's name and settings. The protocol and goal are
/// fixed once created.
pub async fn update_integration(
    db: &Database,
    id: i64,
    write: &IntegrationWrite,
) -> Result<ExternalIntegration, CirculateError> {
    let write = write.clone();
    let updated = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE external_integrations SET name = ?1 WHERE id = ?2",
                params![write.name, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            write_settings(&tx, Scope::Integration(id), &write.settings)?;
            let updated = get_with_settings(&tx, id)?;
            tx.commit()?;
            Ok(updated)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    updated.ok_or_else(|| CirculateError::NotFound {
        kind: "integration".into(),
        id: id.to_string(),
    })
}

/// Delete an integration; its settings cascade.
pub async fn delete_integration(db: &Database, id: i64) -> Result<(), CirculateError> {
    let deleted = db
        .connection()
        .call(move |conn| {
            conn.execute("DELETE FROM external_integrations WHERE id = ?1", params![id])
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if deleted == 0 {
        return Err(CirculateError::NotFound {
            kind: "integration".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
