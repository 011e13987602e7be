// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lane hierarchy persistence.

use circulate_core::CirculateError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Lane, LaneSpec};

/// A lane flattened for insertion; `parent` indexes an earlier entry.
struct FlatLane {
    parent: Option<usize>,
    display_name: String,
    languages: String,
    priority: i64,
}

fn flatten(
    specs: &[LaneSpec],
    parent: Option<usize>,
    out: &mut Vec<FlatLane>,
) -> Result<(), CirculateError> {
    for (priority, spec) in specs.iter().enumerate() {
        let languages = serde_json::to_string(&spec.languages)
            .map_err(CirculateError::storage)?;
        out.push(FlatLane {
            parent,
            display_name: spec.display_name.clone(),
            languages,
            priority: priority as i64,
        });
        let index = out.len() - 1;
        flatten(&spec.children, Some(index), out)?;
    }
    Ok(())
}

/// Replace all of a library's lanes in one transaction.
pub async fn replace_lanes(
    db: &Database,
    library_id: i64,
    specs: &[LaneSpec],
) -> Result<(), CirculateError> {
    let mut flat = Vec::new();
    flatten(specs, None, &mut flat)?;

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM lanes WHERE library_id = ?1", params![library_id])?;
            let mut ids: Vec<i64> = Vec::with_capacity(flat.len());
            for lane in &flat {
                let parent_id = lane.parent.map(|index| ids[index]);
                tx.execute(
                    "INSERT INTO lanes (library_id, parent_id, display_name, languages, priority)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        library_id,
                        parent_id,
                        lane.display_name,
                        lane.languages,
                        lane.priority
                    ],
                )?;
                ids.push(tx.last_insert_rowid());
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A library's lanes in insertion order (parents before children).
pub async fn lanes(db: &Database, library_id: i64) -> Result<Vec<Lane>, CirculateError> {
    let rows = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, parent_id, display_name, languages, priority
                 FROM lanes WHERE library_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![library_id], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    rows.into_iter()
        .map(|(id, parent_id, display_name, languages, priority)| {
            Ok(Lane {
                id,
                library_id,
                parent_id,
                display_name,
                languages: serde_json::from_str(&languages).map_err(CirculateError::storage)?,
                priority,
            })
        })
        .collect()
}
