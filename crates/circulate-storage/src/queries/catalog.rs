// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Imported works with their licenses and delivery formats.

use circulate_core::metadata::Metadata;
use circulate_core::types::now_timestamp;
use circulate_core::{CirculateError, ImportedWork};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::StoredWork;

struct LicenseRow {
    identifier: String,
    checkout_url: Option<String>,
    status_url: Option<String>,
    expires: Option<String>,
    remaining: Option<i64>,
    concurrent: Option<i64>,
}

struct FormatRow {
    content_type: Option<String>,
    drm_scheme: Option<String>,
    rights_uri: String,
}

/// Insert or refresh one work. Licenses and formats from an earlier import
/// are replaced, never merged.
pub async fn apply_metadata(
    db: &Database,
    metadata: &Metadata,
) -> Result<ImportedWork, CirculateError> {
    let data_source = metadata.data_source.clone();
    let identifier = metadata.primary_identifier.clone();
    let title = metadata.title.clone();
    let subtitle = metadata.subtitle.clone();
    let language = metadata.language.clone();
    let medium = metadata.medium.map(|m| m.to_string());
    let publisher = metadata.publisher.clone();
    let published = metadata.published.clone();
    let authors = serde_json::to_string(&metadata.authors).map_err(CirculateError::storage)?;
    let owned = metadata.circulation.licenses_owned;
    let available = metadata.circulation.licenses_available;
    let updated_at = now_timestamp();
    let licenses: Vec<LicenseRow> = metadata
        .circulation
        .licenses
        .iter()
        .map(|license| LicenseRow {
            identifier: license.identifier.clone(),
            checkout_url: license.checkout_url.clone(),
            status_url: license.status_url.clone(),
            expires: license.expires.map(|e| e.to_rfc3339()),
            remaining: license.remaining_checkouts,
            concurrent: license.concurrent_checkouts,
        })
        .collect();
    let formats: Vec<FormatRow> = metadata
        .circulation
        .formats
        .iter()
        .map(|format| FormatRow {
            content_type: format.content_type.clone(),
            drm_scheme: format.drm_scheme.clone(),
            rights_uri: format.rights_uri.clone(),
        })
        .collect();

    let result_identifier = identifier.clone();
    let (id, is_new) = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM works WHERE data_source = ?1 AND identifier = ?2",
                    params![data_source, identifier],
                    |row| row.get(0),
                )
                .optional()?;

            let id = match existing {
                Some(id) => {
                    tx.execute(
                        "UPDATE works SET title = ?1, subtitle = ?2, language = ?3, medium = ?4,
                         publisher = ?5, published = ?6, authors = ?7, licenses_owned = ?8,
                         licenses_available = ?9, updated_at = ?10 WHERE id = ?11",
                        params![
                            title, subtitle, language, medium, publisher, published, authors,
                            owned, available, updated_at, id
                        ],
                    )?;
                    tx.execute("DELETE FROM licenses WHERE work_id = ?1", params![id])?;
                    tx.execute("DELETE FROM delivery_formats WHERE work_id = ?1", params![id])?;
                    id
                }
                None => {
                    tx.execute(
                        "INSERT INTO works (data_source, identifier, title, subtitle, language,
                         medium, publisher, published, authors, licenses_owned,
                         licenses_available, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                        params![
                            data_source, identifier, title, subtitle, language, medium,
                            publisher, published, authors, owned, available, updated_at
                        ],
                    )?;
                    tx.last_insert_rowid()
                }
            };

            for license in &licenses {
                tx.execute(
                    "INSERT INTO licenses (work_id, identifier, checkout_url, status_url, expires,
                     remaining_checkouts, concurrent_checkouts)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        id,
                        license.identifier,
                        license.checkout_url,
                        license.status_url,
                        license.expires,
                        license.remaining,
                        license.concurrent
                    ],
                )?;
            }
            for format in &formats {
                tx.execute(
                    "INSERT INTO delivery_formats (work_id, content_type, drm_scheme, rights_uri)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, format.content_type, format.drm_scheme, format.rights_uri],
                )?;
            }
            tx.commit()?;
            Ok((id, existing.is_none()))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(ImportedWork {
        id,
        identifier: result_identifier,
        is_new,
    })
}

/// Fetch a stored work with its license and format counts.
pub async fn get_work(
    db: &Database,
    data_source: &str,
    identifier: &str,
) -> Result<Option<StoredWork>, CirculateError> {
    let data_source = data_source.to_string();
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT w.id, w.data_source, w.identifier, w.title, w.medium, w.language,
                        w.licenses_owned, w.licenses_available,
                        (SELECT COUNT(*) FROM licenses l WHERE l.work_id = w.id),
                        (SELECT COUNT(*) FROM delivery_formats f WHERE f.work_id = w.id)
                 FROM works w WHERE w.data_source = ?1 AND w.identifier = ?2",
                params![data_source, identifier],
                |row| {
                    Ok(StoredWork {
                        id: row.get(0)?,
                        data_source: row.get(1)?,
                        identifier: row.get(2)?,
                        title: row.get(3)?,
                        medium: row.get(4)?,
                        language: row.get(5)?,
                        licenses_owned: row.get(6)?,
                        licenses_available: row.get(7)?,
                        license_count: row.get(8)?,
                        format_count: row.get(9)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
