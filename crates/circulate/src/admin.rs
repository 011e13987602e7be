// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `circulate admin` commands.

use std::str::FromStr;

use circulate_config::CirculateConfig;
use circulate_core::types::RoleGrant;
use circulate_core::{AdminRole, CirculateError, StorageAdapter};
use circulate_storage::queries::admins::hash_token;
use rand::Rng;
use tracing::info;

use crate::context;

/// Generates a random 256-bit API token, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Creates an admin holding `role` and returns its API token.
///
/// Only the token's hash is stored, so the returned value is the one chance
/// to record it.
pub async fn add_admin(
    config: &CirculateConfig,
    email: &str,
    role: &str,
    library: Option<&str>,
) -> Result<String, CirculateError> {
    let role = AdminRole::from_str(role)
        .map_err(|_| CirculateError::Config(format!("unknown admin role {role:?}")))?;

    let storage = context::open_storage(config).await?;
    let library_id = match (role.is_library_scoped(), library) {
        (true, None) => {
            return Err(CirculateError::Config(format!(
                "role {role} requires --library"
            )));
        }
        (false, Some(_)) => {
            return Err(CirculateError::Config(format!(
                "role {role} applies to every library; drop --library"
            )));
        }
        (true, Some(short_name)) => {
            let found = storage.get_library_by_short_name(short_name).await?;
            let library = found.ok_or_else(|| CirculateError::NotFound {
                kind: "library".into(),
                id: short_name.to_string(),
            })?;
            Some(library.id)
        }
        (false, None) => None,
    };

    let token = generate_token();
    let admin = storage
        .create_admin(email, &hash_token(&token), &[RoleGrant { role, library_id }])
        .await?;
    info!(admin = %admin.email, %role, "admin created");
    storage.close().await?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::temp_config;
    use circulate_core::types::LibraryWrite;

    #[test]
    fn tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn added_admin_is_found_by_token() {
        let (_dir, config) = temp_config();
        let token = add_admin(&config, "root@example.com", "system", None)
            .await
            .unwrap();

        let storage = context::open_storage(&config).await.unwrap();
        let admin = storage
            .admin_by_token_hash(&hash_token(&token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.email, "root@example.com");
        assert!(admin.is_system_admin());
    }

    #[tokio::test]
    async fn library_role_needs_existing_library() {
        let (_dir, config) = temp_config();

        let err = add_admin(&config, "m@example.com", "manager", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CirculateError::Config(_)));

        let err = add_admin(&config, "m@example.com", "manager", Some("nypl"))
            .await
            .unwrap_err();
        assert!(matches!(err, CirculateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn library_role_is_scoped() {
        let (_dir, config) = temp_config();
        let storage = context::open_storage(&config).await.unwrap();
        let library = storage
            .create_library(&LibraryWrite {
                uuid: "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0".into(),
                short_name: "nypl".into(),
                name: "New York Public Library".into(),
                settings: Vec::new(),
            })
            .await
            .unwrap();
        storage.close().await.unwrap();

        let token = add_admin(&config, "m@example.com", "manager", Some("nypl"))
            .await
            .unwrap();
        let storage = context::open_storage(&config).await.unwrap();
        let admin = storage
            .admin_by_token_hash(&hash_token(&token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            admin.roles,
            vec![RoleGrant {
                role: AdminRole::LibraryManager,
                library_id: Some(library.id),
            }]
        );
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let (_dir, config) = temp_config();
        let err = add_admin(&config, "x@example.com", "owner", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown admin role"));
    }
}
