// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Circulate.

use thiserror::Error;

/// The primary error type used across all Circulate crates.
///
/// Validation failures in the admin controllers are *not* errors: they are
/// returned as [`crate::ProblemDetail`] values. This type covers failures that
/// abort an operation.
#[derive(Debug, Error)]
pub enum CirculateError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound HTTP failures (registry, feed, or license status endpoint).
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A catalog feed could not be parsed or imported.
    #[error("feed error: {message}")]
    Feed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A plugin failed to load, register, or run.
    #[error("plugin error: {plugin}: {message}")]
    Plugin { plugin: String, message: String },

    /// The acting admin lacks the role required for the operation.
    #[error("admin not authorized: {0}")]
    AdminNotAuthorized(String),

    /// A referenced record does not exist.
    #[error("not found: {kind}/{id}")]
    NotFound { kind: String, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CirculateError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CirculateError::Storage {
            source: Box::new(source),
        }
    }

    /// Returns true for authorization failures.
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, CirculateError::AdminNotAuthorized(_))
    }
}
