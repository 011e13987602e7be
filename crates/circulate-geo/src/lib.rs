// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Geographic service-area support for Circulate.
//!
//! - [`Gazetteer`] resolves state and province abbreviations, zip codes,
//!   forward sortation areas, and U.S. city and county names locally.
//! - [`RegistryClient`] asks discovery registries about places the gazetteer
//!   does not know.
//! - [`validate_geographic_areas`] turns submitted areas into the stored
//!   per-nation form.

pub mod areas;
mod data;
pub mod gazetteer;
pub mod registry;

pub use areas::{area_entries, validate_geographic_areas};
pub use gazetteer::Gazetteer;
pub use registry::RegistryClient;
