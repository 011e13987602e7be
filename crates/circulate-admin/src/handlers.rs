// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for the admin API.
//!
//! Handlers extract the admin and form, then delegate to the controllers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use circulate_core::{Admin, HealthStatus};
use serde::Serialize;

use crate::controllers::{LibrarySettingsController, SearchServicesController};
use crate::form::FormData;
use crate::response::{AdminError, Outcome};
use crate::server::AdminState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /health (unauthenticated).
pub async fn get_health(State(state): State<AdminState>) -> Response {
    let (code, status, detail) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy", None),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, "degraded", Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(e.to_string())),
    };
    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        detail,
    };
    (code, Json(body)).into_response()
}

/// GET /admin/libraries
pub async fn get_libraries(
    State(state): State<AdminState>,
    Extension(admin): Extension<Admin>,
) -> Result<Outcome, AdminError> {
    let lookup = state.place_lookup().await?;
    let controller =
        LibrarySettingsController::new(state.storage.as_ref(), &state.gazetteer, lookup.as_ref());
    Ok(Outcome::Json(controller.process_get(&admin).await?))
}

/// POST /admin/libraries
pub async fn post_libraries(
    State(state): State<AdminState>,
    Extension(admin): Extension<Admin>,
    form: FormData,
) -> Result<Outcome, AdminError> {
    let lookup = state.place_lookup().await?;
    let controller =
        LibrarySettingsController::new(state.storage.as_ref(), &state.gazetteer, lookup.as_ref());
    Ok(controller.process_post(&admin, &form).await?)
}

/// DELETE /admin/library/{uuid}
pub async fn delete_library(
    State(state): State<AdminState>,
    Extension(admin): Extension<Admin>,
    Path(uuid): Path<String>,
) -> Result<Outcome, AdminError> {
    let lookup = state.place_lookup().await?;
    let controller =
        LibrarySettingsController::new(state.storage.as_ref(), &state.gazetteer, lookup.as_ref());
    Ok(controller.process_delete(&admin, &uuid).await?)
}

/// GET and POST /admin/search_services
pub async fn search_services(
    State(state): State<AdminState>,
    Extension(admin): Extension<Admin>,
    method: Method,
    form: FormData,
) -> Result<Outcome, AdminError> {
    let controller = SearchServicesController::new(state.storage.as_ref());
    Ok(controller
        .process_search_services(&admin, &method, &form)
        .await?)
}

/// DELETE /admin/search_service/{id}
pub async fn delete_search_service(
    State(state): State<AdminState>,
    Extension(admin): Extension<Admin>,
    Path(id): Path<String>,
) -> Result<Outcome, AdminError> {
    let controller = SearchServicesController::new(state.storage.as_ref());
    Ok(controller.delete_search_service(&admin, &id).await?)
}
