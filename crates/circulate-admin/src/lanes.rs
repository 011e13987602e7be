// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default lane hierarchy built from a library's language settings.

use std::collections::BTreeMap;

use circulate_core::types::LaneSpec;

use crate::settings::{
    LARGE_COLLECTION_LANGUAGES, SMALL_COLLECTION_LANGUAGES, TINY_COLLECTION_LANGUAGES,
};

const OTHER_LANGUAGES: &str = "Other Languages";

/// Sublanes created under each large-collection language.
const LARGE_COLLECTION_SUBLANES: [&str; 3] = ["Fiction", "Nonfiction", "Children and Young Adult"];

/// English name for an ISO 639-2 code, or the code itself when unknown.
pub fn language_name(code: &str) -> String {
    let name = match code {
        "eng" => "English",
        "ger" | "deu" => "German",
        "fre" | "fra" => "French",
        "spa" => "Spanish",
        "ita" => "Italian",
        "por" => "Portuguese",
        "rus" => "Russian",
        "chi" | "zho" => "Chinese",
        "jpn" => "Japanese",
        "kor" => "Korean",
        "ara" => "Arabic",
        "heb" => "Hebrew",
        "hin" => "Hindi",
        "pol" => "Polish",
        "dut" | "nld" => "Dutch",
        "swe" => "Swedish",
        "nor" => "Norwegian",
        "dan" => "Danish",
        "fin" => "Finnish",
        "gre" | "ell" => "Greek",
        "tur" => "Turkish",
        "vie" => "Vietnamese",
        "tha" => "Thai",
        "tgl" => "Tagalog",
        "hat" => "Haitian",
        "yid" => "Yiddish",
        "ukr" => "Ukrainian",
        "per" | "fas" => "Persian",
        "ben" => "Bengali",
        "urd" => "Urdu",
        _ => return code.to_string(),
    };
    name.to_string()
}

fn language_lane(code: &str, children: Vec<LaneSpec>) -> LaneSpec {
    LaneSpec {
        display_name: language_name(code),
        languages: vec![code.to_string()],
        children,
    }
}

/// Builds the default lanes for a library's language settings.
///
/// Large-collection languages get a top-level lane with genre sublanes,
/// small-collection languages a plain top-level lane, and tiny-collection
/// languages share an "Other Languages" lane with one sublane each. With no
/// languages configured at all the library is treated as a large English
/// collection.
pub fn default_lanes(large: &[String], small: &[String], tiny: &[String]) -> Vec<LaneSpec> {
    let default_large = ["eng".to_string()];
    let large = if large.is_empty() && small.is_empty() && tiny.is_empty() {
        &default_large[..]
    } else {
        large
    };

    let mut lanes = Vec::new();
    for code in large {
        let children = LARGE_COLLECTION_SUBLANES
            .iter()
            .map(|name| LaneSpec {
                display_name: (*name).to_string(),
                languages: vec![code.clone()],
                children: Vec::new(),
            })
            .collect();
        lanes.push(language_lane(code, children));
    }
    for code in small {
        lanes.push(language_lane(code, Vec::new()));
    }
    if !tiny.is_empty() {
        lanes.push(LaneSpec {
            display_name: OTHER_LANGUAGES.to_string(),
            languages: tiny.to_vec(),
            children: tiny.iter().map(|code| language_lane(code, Vec::new())).collect(),
        });
    }
    lanes
}

/// Reads the language settings out of stored settings and builds the lanes.
///
/// Language settings hold JSON lists; malformed values count as empty.
pub fn default_lanes_for_settings(settings: &BTreeMap<String, String>) -> Vec<LaneSpec> {
    let languages = |key: &str| -> Vec<String> {
        settings
            .get(key)
            .and_then(|value| serde_json::from_str::<Vec<String>>(value).ok())
            .unwrap_or_default()
    };
    default_lanes(
        &languages(LARGE_COLLECTION_LANGUAGES),
        &languages(SMALL_COLLECTION_LANGUAGES),
        &languages(TINY_COLLECTION_LANGUAGES),
    )
}
