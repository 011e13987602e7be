// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication for admin routes.
//!
//! Tokens are stored as SHA-256 hashes. A request is authenticated when the
//! hash of its `Authorization: Bearer <token>` value belongs to an admin; the
//! admin is then available to handlers as an `Extension<Admin>`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use circulate_core::problem::ADMIN_NOT_AUTHORIZED;
use circulate_storage::queries::admins::hash_token;
use tracing::{debug, warn};

use crate::response::{AdminError, Problem};
use crate::server::AdminState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the requesting admin, or rejects the request with 401.
pub async fn admin_auth(
    State(state): State<AdminState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        debug!(path = %request.uri().path(), "admin request without bearer token");
        return Problem(ADMIN_NOT_AUTHORIZED.with_detail("An admin bearer token is required."))
            .into_response();
    };

    let admin = match state.storage.admin_by_token_hash(&hash_token(token)).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            warn!(path = %request.uri().path(), "admin request with unknown token");
            return Problem(ADMIN_NOT_AUTHORIZED.with_detail("The admin token is not valid."))
                .into_response();
        }
        Err(e) => return AdminError(e).into_response(),
    };

    debug!(admin = %admin.email, path = %request.uri().path(), "admin authenticated");
    request.extensions_mut().insert(admin);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Router, middleware};
    use circulate_core::Admin;
    use circulate_geo::Gazetteer;
    use circulate_test_utils::TestHarness;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn request(header: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/admin/libraries");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn reads_bearer_token() {
        assert_eq!(bearer_token(&request(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&request(None)), None);
    }

    async fn ping(harness: &TestHarness, token: &str) -> Response {
        let state = AdminState::new(
            harness.storage(),
            Arc::new(Gazetteer::embedded()),
            reqwest::Client::new(),
        );
        let app = Router::new()
            .route(
                "/admin/ping",
                get(|Extension(admin): Extension<Admin>| async move { admin.email }),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth))
            .with_state(state);
        let request = axum::http::Request::builder()
            .uri("/admin/ping")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn known_token_resolves_admin() {
        let harness = TestHarness::new().await.unwrap();
        let (_, token) = harness.add_system_admin().await.unwrap();

        let response = ping(&harness, &token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"sysadmin@example.com");

        let response = ping(&harness, "stolen").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(logs_contain("admin request with unknown token"));
    }
}
