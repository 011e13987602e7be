// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validation of library service and focus areas.
//!
//! Each entered area is resolved to a nation. Abbreviations, zip codes and
//! postal codes are checked against the gazetteer and never sent to a
//! registry; free-text places the gazetteer cannot resolve go to the
//! [`PlaceLookup`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use circulate_core::problem::{INVALID_INPUT, UNKNOWN_LOCATION};
use circulate_core::{Nation, PlaceLookup, ProblemDetail};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::gazetteer::Gazetteer;

static US_ZIPCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());

static CA_POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]\d[A-Za-z](\s?\d[A-Za-z]\d)?$").unwrap());

static PLACE_AND_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?),\s*([A-Za-z]{2})$").unwrap());

const EVERYWHERE: &str = "everywhere";

/// Splits submitted area values into individual entries.
///
/// A single value holding a JSON list is expanded into its items; otherwise
/// each submitted value is one entry. Blank entries are dropped.
pub fn area_entries(values: &[String]) -> Vec<String> {
    if let [single] = values {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(single) {
            return items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .filter(|s| !s.trim().is_empty())
                .collect();
        }
    }
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Resolves every area entry and returns the stored form
/// `{"CA": [...], "US": [...]}`.
///
/// Zip and postal code entries are stored as `{code: "Place, Region"}`
/// objects; everything else is stored as entered. The first entry that
/// cannot be resolved ends validation with its problem detail.
pub async fn validate_geographic_areas(
    entries: &[String],
    gazetteer: &Gazetteer,
    lookup: &dyn PlaceLookup,
) -> Result<String, ProblemDetail> {
    let mut locations: BTreeMap<String, Vec<Value>> = Nation::ALL
        .iter()
        .map(|nation| (nation.to_string(), Vec::new()))
        .collect();

    for entry in entries {
        let (nation, value) = resolve(entry.trim(), gazetteer, lookup).await?;
        debug!(entry = %entry, nation = %nation, "resolved geographic area");
        locations.entry(nation.to_string()).or_default().push(value);
    }

    circulate_core::json::to_spaced_string(&locations)
        .map_err(|e| INVALID_INPUT.with_detail(format!("Could not encode areas: {e}")))
}

async fn resolve(
    zone: &str,
    gazetteer: &Gazetteer,
    lookup: &dyn PlaceLookup,
) -> Result<(Nation, Value), ProblemDetail> {
    if zone.eq_ignore_ascii_case(EVERYWHERE) {
        return Ok((Nation::US, Value::String(zone.to_string())));
    }

    if zone.chars().count() == 2 {
        let abbreviation = zone.to_ascii_uppercase();
        if gazetteer.is_ca_province(&abbreviation) {
            return Ok((Nation::CA, Value::String(zone.to_string())));
        }
        if gazetteer.is_us_state(&abbreviation) {
            return Ok((Nation::US, Value::String(zone.to_string())));
        }
        return Err(UNKNOWN_LOCATION.with_detail(format!(
            "\"{zone}\" is not a valid U.S. state or Canadian province abbreviation."
        )));
    }

    if US_ZIPCODE.is_match(zone) {
        return match gazetteer.zipcode(zone) {
            Some(place) => Ok((Nation::US, coded_place(zone, place))),
            None => Err(UNKNOWN_LOCATION
                .with_detail(format!("\"{zone}\" is not a valid U.S. zipcode."))),
        };
    }

    if CA_POSTAL_CODE.is_match(zone) {
        return match gazetteer.forward_sortation_area(zone) {
            Some(place) => Ok((Nation::CA, coded_place(zone, place))),
            None => Err(UNKNOWN_LOCATION
                .with_detail(format!("\"{zone}\" is not a valid Canadian zipcode."))),
        };
    }

    let known_us_place = PLACE_AND_STATE
        .captures(zone)
        .is_some_and(|caps| gazetteer.has_us_place(&caps[1], &caps[2]));
    if known_us_place {
        return Ok((Nation::US, Value::String(zone.to_string())));
    }

    match lookup.find_location(zone).await? {
        Some(nation) => Ok((nation, Value::String(zone.to_string()))),
        None => Err(UNKNOWN_LOCATION.with_detail(format!("Unable to locate \"{zone}\"."))),
    }
}

fn coded_place(code: &str, place: String) -> Value {
    let mut object = serde_json::Map::new();
    object.insert(code.to_string(), Value::String(place));
    Value::Object(object)
}
