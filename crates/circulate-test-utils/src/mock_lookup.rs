// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A place lookup answering from a fixed table.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use circulate_core::{Nation, PlaceLookup, ProblemDetail};

/// Resolves places from a table and records every place it was asked about.
///
/// When a failure is set, every lookup returns it.
#[derive(Debug, Default)]
pub struct MockPlaceLookup {
    places: HashMap<String, Nation>,
    failure: Option<ProblemDetail>,
    asked: Mutex<Vec<String>>,
}

impl MockPlaceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, place: &str, nation: Nation) -> Self {
        self.places.insert(place.to_string(), nation);
        self
    }

    pub fn failing_with(mut self, problem: ProblemDetail) -> Self {
        self.failure = Some(problem);
        self
    }

    /// Places asked about so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlaceLookup for MockPlaceLookup {
    async fn find_location(&self, place: &str) -> Result<Option<Nation>, ProblemDetail> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(place.to_string());
        }
        if let Some(problem) = &self.failure {
            return Err(problem.clone());
        }
        Ok(self.places.get(place).copied())
    }
}
