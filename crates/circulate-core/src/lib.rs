// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Circulate.
//!
//! This crate provides the foundational trait definitions, error types,
//! problem details, and common types used throughout the Circulate workspace.

pub mod error;
pub mod json;
pub mod metadata;
pub mod problem;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CirculateError;
pub use problem::ProblemDetail;
pub use types::{Admin, AdminRole, ExternalIntegration, HealthStatus, Library, Nation};

// Re-export all adapter traits at crate root.
pub use traits::{ImportPipeline, ImportedWork, PlaceLookup, ServiceAdapter, StorageAdapter};
