// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Library CRUD operations.

use circulate_core::CirculateError;
use rusqlite::{OptionalExtension, Row, params};

use crate::database::Database;
use crate::models::{Library, LibraryWrite};
use crate::queries::settings::{Scope, write_settings};

const COLUMNS: &str = "id, uuid, short_name, name";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Library> {
    Ok(Library {
        id: row.get(0)?,
        uuid: row.get(1)?,
        short_name: row.get(2)?,
        name: row.get(3)?,
    })
}

/// All libraries ordered by id.
pub async fn list_libraries(db: &Database) -> Result<Vec<Library>, CirculateError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM libraries ORDER BY id"))?;
            let rows = stmt.query_map([], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_library_by_uuid(
    db: &Database,
    uuid: &str,
) -> Result<Option<Library>, CirculateError> {
    let uuid = uuid.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM libraries WHERE uuid = ?1"),
                params![uuid],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_library_by_short_name(
    db: &Database,
    short_name: &str,
) -> Result<Option<Library>, CirculateError> {
    let short_name = short_name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM libraries WHERE short_name = ?1"),
                params![short_name],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a library and its settings in one transaction.
pub async fn create_library(db: &Database, write: &LibraryWrite) -> Result<Library, CirculateError> {
    let write = write.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO libraries (uuid, short_name, name) VALUES (?1, ?2, ?3)",
                params![write.uuid, write.short_name, write.name],
            )?;
            let id = tx.last_insert_rowid();
            write_settings(&tx, Scope::Library(id), &write.settings)?;
            tx.commit()?;
            Ok(Library {
                id,
                uuid: write.uuid,
                short_name: write.short_name,
                name: write.name,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a library's names and apply its setting changes in one transaction.
///
/// The uuid of an existing library never changes.
pub async fn update_library(
    db: &Database,
    id: i64,
    write: &LibraryWrite,
) -> Result<Library, CirculateError> {
    let write = write.clone();
    let updated = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE libraries SET short_name = ?1, name = ?2 WHERE id = ?3",
                params![write.short_name, write.name, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            write_settings(&tx, Scope::Library(id), &write.settings)?;
            let library = tx.query_row(
                &format!("SELECT {COLUMNS} FROM libraries WHERE id = ?1"),
                params![id],
                from_row,
            )?;
            tx.commit()?;
            Ok(Some(library))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    updated.ok_or_else(|| CirculateError::NotFound {
        kind: "library".into(),
        id: id.to_string(),
    })
}

/// Delete a library. Settings, lanes, and scoped admin roles cascade.
pub async fn delete_library(db: &Database, id: i64) -> Result<(), CirculateError> {
    let deleted = db
        .connection()
        .call(move |conn| conn.execute("DELETE FROM libraries WHERE id = ?1", params![id]))
        .await
        .map_err(crate::database::map_tr_err)?;
    if deleted == 0 {
        return Err(CirculateError::NotFound {
            kind: "library".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
