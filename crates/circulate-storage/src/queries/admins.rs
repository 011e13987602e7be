// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin accounts and their role grants.

use std::str::FromStr;

use circulate_core::CirculateError;
use circulate_core::types::{AdminRole, now_timestamp};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::database::Database;
use crate::models::{Admin, RoleGrant};

/// Hashes an API token for storage and lookup (lowercase hex SHA-256).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create an admin with the given API token hash and roles.
pub async fn create_admin(
    db: &Database,
    email: &str,
    token_hash: &str,
    roles: &[RoleGrant],
) -> Result<Admin, CirculateError> {
    let stored_email = email.to_string();
    let token_hash = token_hash.to_string();
    let grants: Vec<(String, Option<i64>)> = roles
        .iter()
        .map(|grant| (grant.role.to_string(), grant.library_id))
        .collect();
    let created_at = now_timestamp();

    let id = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO admins (email, token_hash, created_at) VALUES (?1, ?2, ?3)",
                params![stored_email, token_hash, created_at],
            )?;
            let id = tx.last_insert_rowid();
            for (role, library_id) in &grants {
                tx.execute(
                    "INSERT INTO admin_roles (admin_id, library_id, role) VALUES (?1, ?2, ?3)",
                    params![id, library_id, role],
                )?;
            }
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(Admin {
        id,
        email: email.to_string(),
        roles: roles.to_vec(),
    })
}

/// Look up the admin owning an API token hash, with their roles.
pub async fn admin_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<Option<Admin>, CirculateError> {
    let token_hash = token_hash.to_string();
    let found = db
        .connection()
        .call(move |conn| {
            let admin: Option<(i64, String)> = conn
                .query_row(
                    "SELECT id, email FROM admins WHERE token_hash = ?1",
                    params![token_hash],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let Some((id, email)) = admin else {
                return Ok(None);
            };
            let mut stmt = conn.prepare(
                "SELECT role, library_id FROM admin_roles WHERE admin_id = ?1 ORDER BY id",
            )?;
            let grants = stmt
                .query_map(params![id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Option<i64>>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some((id, email, grants)))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    let Some((id, email, grants)) = found else {
        return Ok(None);
    };
    let roles = grants
        .into_iter()
        .map(|(role, library_id)| {
            AdminRole::from_str(&role)
                .map(|role| RoleGrant { role, library_id })
                .map_err(|_| CirculateError::Internal(format!("unknown admin role `{role}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Admin { id, email, roles }))
}
