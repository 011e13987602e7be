// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP API for Circulate.
//!
//! Provides the library settings and search service controllers, the form
//! extractor and problem responses they share, bearer-token admin
//! authentication, and the axum server that mounts them next to plugin
//! routes.

pub mod auth;
pub mod color;
pub mod controllers;
pub mod form;
pub mod handlers;
pub mod lanes;
pub mod response;
pub mod server;
pub mod settings;

pub use controllers::{LibrarySettingsController, SearchServicesController};
pub use form::{FormData, UploadedFile};
pub use response::{AdminError, Outcome, Problem};
pub use server::{AdminState, build_app, build_router, start_server};
