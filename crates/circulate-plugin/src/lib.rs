// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin loading for Circulate.
//!
//! Plugins are compiled in and offered to the [`PluginRegistry`] as named
//! [`PluginSource`] constructors. The registry validates each one, mounts its
//! HTTP routes under `/plugins/<name>`, and runs its scripts on demand.

pub mod manifest;
pub mod plugin;
pub mod registry;

pub use manifest::{PLUGIN_PREFIX, PluginManifest};
pub use plugin::{Plugin, PluginConstructor, PluginRoute, PluginScript, PluginSource};
pub use registry::{PluginEntry, PluginRegistry, PluginStatus, ScriptReport};
