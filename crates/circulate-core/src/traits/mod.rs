// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Backends extend the [`ServiceAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod lookup;
pub mod pipeline;
pub mod storage;

pub use adapter::ServiceAdapter;
pub use lookup::PlaceLookup;
pub use pipeline::{ImportPipeline, ImportedWork};
pub use storage::StorageAdapter;
