// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitor run records.

use circulate_core::CirculateError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::Timestamp;

pub async fn record_timestamp(db: &Database, timestamp: &Timestamp) -> Result<(), CirculateError> {
    let ts = timestamp.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO timestamps (service, collection_id, start, finish, counter, exception)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![ts.service, ts.collection_id, ts.start, ts.finish, ts.counter, ts.exception],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recent run of `service` for a collection (or for no collection).
pub async fn latest_timestamp(
    db: &Database,
    service: &str,
    collection_id: Option<i64>,
) -> Result<Option<Timestamp>, CirculateError> {
    let service = service.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT service, collection_id, start, finish, counter, exception
                 FROM timestamps WHERE service = ?1 AND collection_id IS ?2
                 ORDER BY id DESC LIMIT 1",
                params![service, collection_id],
                |row| {
                    Ok(Timestamp {
                        service: row.get(0)?,
                        collection_id: row.get(1)?,
                        start: row.get(2)?,
                        finish: row.get(3)?,
                        counter: row.get(4)?,
                        exception: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
