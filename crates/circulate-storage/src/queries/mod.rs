// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for operations on storage entities.

pub mod admins;
pub mod catalog;
pub mod integrations;
pub mod lanes;
pub mod libraries;
pub mod settings;
pub mod timestamps;
