// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin controllers.
//!
//! Controllers take the authenticated admin and the submitted form and return
//! an [`crate::response::Outcome`]. Validation failures are problem details in
//! `Ok`; only authorization and infrastructure failures are `Err`.

pub mod library_settings;
pub mod search_services;

pub use library_settings::LibrarySettingsController;
pub use search_services::SearchServicesController;
