// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Place-name resolution seam used by geographic validation.

use async_trait::async_trait;

use crate::problem::ProblemDetail;
use crate::types::Nation;

/// Resolves a free-text place name into the nation that contains it.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Returns the nation the place belongs to, `None` if no source knows it,
    /// or a problem detail when the sources could not be consulted.
    async fn find_location(&self, place: &str) -> Result<Option<Nation>, ProblemDetail>;
}
