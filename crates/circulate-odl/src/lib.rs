// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OPDS 2.0 and ODL 2.x catalog import for Circulate.
//!
//! [`Opds2Importer`] maps publication metadata, [`Odl2Importer`] adds
//! license and availability data, and [`Odl2ImportMonitor`] runs imports of
//! configured collections and records each run.

pub mod feed;
pub mod importer;
pub mod monitor;
pub mod odl2;
pub mod opds2;

pub use importer::{FeedImporter, ImportReport};
pub use monitor::{Odl2ImportMonitor, SERVICE_NAME, collection_monitors, run_scheduled};
pub use odl2::Odl2Importer;
pub use opds2::Opds2Importer;
