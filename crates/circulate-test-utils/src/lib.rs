// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Circulate integration tests.
//!
//! Provides a [`TestHarness`] backed by a temporary SQLite database with
//! helpers for seeding libraries, admins, and integrations, and a
//! [`MockPlaceLookup`] that answers place lookups from a fixed table.

pub mod harness;
pub mod mock_lookup;

pub use harness::TestHarness;
pub use mock_lookup::MockPlaceLookup;
