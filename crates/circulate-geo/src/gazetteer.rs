// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local place-name data used to resolve service areas without a registry.
//!
//! The gazetteer starts from a small embedded dataset. Larger U.S. zip code
//! and Canadian forward sortation area tables can be merged in from CSV files
//! named in the `[geography]` configuration section.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use circulate_config::model::GeographyConfig;
use circulate_core::CirculateError;
use serde::Deserialize;
use tracing::info;

use crate::data;

/// One row of a U.S. zip code CSV file (`zip,city,state`).
#[derive(Debug, Deserialize)]
struct ZipcodeRow {
    zip: String,
    city: String,
    state: String,
}

/// One row of a Canadian postal CSV file (`fsa,place,province`).
#[derive(Debug, Deserialize)]
struct FsaRow {
    fsa: String,
    place: String,
    province: String,
}

#[derive(Debug, Clone)]
struct Zipcode {
    city: String,
    state: String,
}

#[derive(Debug, Clone)]
struct Fsa {
    place: String,
    province: String,
}

/// Lookup tables for U.S. and Canadian place names.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    us_states: HashMap<String, String>,
    ca_provinces: HashMap<String, String>,
    zipcodes: HashMap<String, Zipcode>,
    /// Lowercased `(place, state)` pairs for cities and counties.
    us_places: HashSet<(String, String)>,
    fsas: HashMap<String, Fsa>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Gazetteer {
    /// Builds a gazetteer from the embedded dataset only.
    pub fn embedded() -> Self {
        let mut gazetteer = Self {
            us_states: data::US_STATES
                .iter()
                .map(|(abbr, name)| (abbr.to_string(), name.to_string()))
                .collect(),
            ca_provinces: data::CA_PROVINCES
                .iter()
                .map(|(abbr, name)| (abbr.to_string(), name.to_string()))
                .collect(),
            zipcodes: HashMap::new(),
            us_places: HashSet::new(),
            fsas: HashMap::new(),
        };
        for (zip, city, state) in data::US_ZIPCODES {
            gazetteer.add_zipcode(zip, city, state);
        }
        for (place, state) in data::US_PLACES {
            gazetteer.add_us_place(place, state);
        }
        for (fsa, place, province) in data::CA_FSAS {
            gazetteer.add_fsa(fsa, place, province);
        }
        gazetteer
    }

    /// Builds the embedded gazetteer and merges any CSV datasets configured.
    pub fn from_config(config: &GeographyConfig) -> Result<Self, CirculateError> {
        let mut gazetteer = Self::embedded();
        if let Some(path) = &config.us_zipcodes_csv {
            gazetteer.load_us_zipcodes(Path::new(path))?;
        }
        if let Some(path) = &config.ca_postal_csv {
            gazetteer.load_ca_postal_codes(Path::new(path))?;
        }
        Ok(gazetteer)
    }

    /// Merges a `zip,city,state` CSV file (with header row).
    pub fn load_us_zipcodes(&mut self, path: &Path) -> Result<usize, CirculateError> {
        let rows: Vec<ZipcodeRow> = read_rows(path)?;
        let count = rows.len();
        for row in rows {
            self.add_zipcode(row.zip.trim(), row.city.trim(), row.state.trim());
        }
        info!(path = %path.display(), count, "loaded U.S. zip codes");
        Ok(count)
    }

    /// Merges a `fsa,place,province` CSV file (with header row).
    pub fn load_ca_postal_codes(&mut self, path: &Path) -> Result<usize, CirculateError> {
        let rows: Vec<FsaRow> = read_rows(path)?;
        let count = rows.len();
        for row in rows {
            self.add_fsa(row.fsa.trim(), row.place.trim(), row.province.trim());
        }
        info!(path = %path.display(), count, "loaded Canadian postal codes");
        Ok(count)
    }

    fn add_zipcode(&mut self, zip: &str, city: &str, state: &str) {
        let state = state.to_ascii_uppercase();
        self.add_us_place(city, &state);
        self.zipcodes.insert(
            zip.to_string(),
            Zipcode {
                city: city.to_string(),
                state,
            },
        );
    }

    fn add_us_place(&mut self, place: &str, state: &str) {
        self.us_places
            .insert((place.to_lowercase(), state.to_ascii_uppercase()));
    }

    fn add_fsa(&mut self, fsa: &str, place: &str, province: &str) {
        self.fsas.insert(
            fsa.to_ascii_uppercase(),
            Fsa {
                place: place.to_string(),
                province: province.to_ascii_uppercase(),
            },
        );
    }

    pub fn is_us_state(&self, abbreviation: &str) -> bool {
        self.us_states.contains_key(abbreviation)
    }

    pub fn is_ca_province(&self, abbreviation: &str) -> bool {
        self.ca_provinces.contains_key(abbreviation)
    }

    /// Returns `"City, ST"` for a known U.S. zip code.
    pub fn zipcode(&self, zip: &str) -> Option<String> {
        self.zipcodes
            .get(zip)
            .map(|z| format!("{}, {}", z.city, z.state))
    }

    /// Returns `"Place, Province"` for a known forward sortation area.
    ///
    /// Only the first three characters of `code` are significant.
    pub fn forward_sortation_area(&self, code: &str) -> Option<String> {
        let fsa: String = code.chars().take(3).collect::<String>().to_ascii_uppercase();
        let entry = self.fsas.get(&fsa)?;
        let province = self
            .ca_provinces
            .get(&entry.province)
            .map(String::as_str)
            .unwrap_or(entry.province.as_str());
        Some(format!("{}, {}", entry.place, province))
    }

    /// True if `"Place, ST"` names a known U.S. city or county.
    pub fn has_us_place(&self, place: &str, state: &str) -> bool {
        self.us_places
            .contains(&(place.trim().to_lowercase(), state.trim().to_ascii_uppercase()))
    }
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, CirculateError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            CirculateError::Config(format!("failed to open {}: {e}", path.display()))
        })?;
    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| {
                CirculateError::Config(format!(
                    "{}: invalid row {}: {e}",
                    path.display(),
                    idx + 1
                ))
            })
        })
        .collect()
}
