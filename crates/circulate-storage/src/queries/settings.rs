// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed configuration settings scoped to a library or an integration.

use std::collections::BTreeMap;

use circulate_core::CirculateError;
use rusqlite::{Connection, params};

use crate::database::Database;

/// Owner of a group of settings.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scope {
    Library(i64),
    Integration(i64),
}

impl Scope {
    fn filter(self) -> (&'static str, i64) {
        match self {
            Scope::Library(id) => ("library_id = ?1 AND external_integration_id IS NULL", id),
            Scope::Integration(id) => ("external_integration_id = ?1 AND library_id IS NULL", id),
        }
    }
}

/// Set or clear one setting. Runs on the caller's connection so it can share
/// a transaction with the owning record's write.
pub(crate) fn write_setting(
    conn: &Connection,
    scope: Scope,
    key: &str,
    value: Option<&str>,
) -> rusqlite::Result<()> {
    let (filter, owner) = scope.filter();
    conn.execute(
        &format!("DELETE FROM configuration_settings WHERE {filter} AND key = ?2"),
        params![owner, key],
    )?;
    if let Some(value) = value {
        let (library_id, integration_id) = match scope {
            Scope::Library(id) => (Some(id), None),
            Scope::Integration(id) => (None, Some(id)),
        };
        conn.execute(
            "INSERT INTO configuration_settings (key, library_id, external_integration_id, value)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, library_id, integration_id, value],
        )?;
    }
    Ok(())
}

pub(crate) fn write_settings(
    conn: &Connection,
    scope: Scope,
    settings: &[(String, Option<String>)],
) -> rusqlite::Result<()> {
    for (key, value) in settings {
        write_setting(conn, scope, key, value.as_deref())?;
    }
    Ok(())
}

/// Settings with a stored value, keyed by setting name.
pub(crate) fn load_settings(
    conn: &Connection,
    scope: Scope,
) -> rusqlite::Result<BTreeMap<String, String>> {
    let (filter, owner) = scope.filter();
    let mut stmt = conn.prepare(&format!(
        "SELECT key, value FROM configuration_settings WHERE {filter} AND value IS NOT NULL"
    ))?;
    let rows = stmt.query_map(params![owner], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

pub async fn library_settings(
    db: &Database,
    library_id: i64,
) -> Result<BTreeMap<String, String>, CirculateError> {
    db.connection()
        .call(move |conn| load_settings(conn, Scope::Library(library_id)))
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn set_library_setting(
    db: &Database,
    library_id: i64,
    key: &str,
    value: Option<&str>,
) -> Result<(), CirculateError> {
    let key = key.to_string();
    let value = value.map(str::to_string);
    db.connection()
        .call(move |conn| {
            write_setting(conn, Scope::Library(library_id), &key, value.as_deref())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
