// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Controller outcomes and their HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use circulate_core::problem::{ADMIN_NOT_AUTHORIZED, INTERNAL_SERVER_ERROR, NOT_FOUND};
use circulate_core::{CirculateError, ProblemDetail};
use serde_json::Value;
use tracing::{error, warn};

pub const PROBLEM_JSON: &str = "application/problem+json";

/// A problem detail rendered as `application/problem+json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem(pub ProblemDetail);

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, PROBLEM_JSON)], Json(self.0)).into_response()
    }
}

/// The result of a controller call that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 200 with a JSON document.
    Json(Value),
    /// 201 with the new record's identifier as the body.
    Created(String),
    /// 200 with the edited record's identifier as the body.
    Updated(String),
    /// 200 after a delete.
    Deleted,
    /// A validation failure.
    Problem(ProblemDetail),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Created(_) => StatusCode::CREATED,
            Outcome::Problem(problem) => StatusCode::from_u16(problem.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            _ => StatusCode::OK,
        }
    }

    /// The problem detail, when this outcome is a validation failure.
    pub fn problem(&self) -> Option<&ProblemDetail> {
        match self {
            Outcome::Problem(problem) => Some(problem),
            _ => None,
        }
    }
}

impl From<ProblemDetail> for Outcome {
    fn from(problem: ProblemDetail) -> Self {
        Outcome::Problem(problem)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Outcome::Json(value) => (status, Json(value)).into_response(),
            Outcome::Created(id) | Outcome::Updated(id) => (status, id).into_response(),
            Outcome::Deleted => (status, "Deleted").into_response(),
            Outcome::Problem(problem) => Problem(problem).into_response(),
        }
    }
}

/// Errors that abort an admin request.
#[derive(Debug)]
pub struct AdminError(pub CirculateError);

impl From<CirculateError> for AdminError {
    fn from(err: CirculateError) -> Self {
        AdminError(err)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self.0 {
            CirculateError::AdminNotAuthorized(reason) => {
                warn!(reason = %reason, "admin request refused");
                Problem(ADMIN_NOT_AUTHORIZED).into_response()
            }
            CirculateError::NotFound { kind, id } => {
                Problem(NOT_FOUND.with_detail(format!("No {kind} with id {id}."))).into_response()
            }
            other => {
                error!(error = %other, "admin request failed");
                Problem(INTERNAL_SERVER_ERROR).into_response()
            }
        }
    }
}
