// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Library settings: list, create or edit, and delete libraries.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use circulate_core::json::to_spaced_string;
use circulate_core::problem::{
    INCOMPLETE_CONFIGURATION, INVALID_CONFIGURATION_OPTION, LIBRARY_NOT_FOUND,
    LIBRARY_SHORT_NAME_ALREADY_IN_USE, MISSING_LIBRARY_NAME, MISSING_LIBRARY_SHORT_NAME,
};
use circulate_core::types::LibraryWrite;
use circulate_core::{Admin, CirculateError, Library, PlaceLookup, ProblemDetail, StorageAdapter};
use circulate_geo::{Gazetteer, area_entries, validate_geographic_areas};
use regex::Regex;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::color::{MIN_CONTRAST_RATIO, contrast_checker_url, contrast_ratio, parse_hex_color};
use crate::form::{FormData, UploadedFile};
use crate::lanes::default_lanes_for_settings;
use crate::response::Outcome;
use crate::settings::{
    DEFAULT_WEB_BACKGROUND_COLOR, DEFAULT_WEB_FOREGROUND_COLOR, LANGUAGE_SETTINGS,
    LIBRARY_SETTINGS, SettingDef, SettingKind, WEB_BACKGROUND_COLOR, WEB_FOREGROUND_COLOR,
    WEB_HEADER_LABELS, WEB_HEADER_LINKS,
};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Setting writes produced from a form; `None` clears the setting.
type SettingWrites = Vec<(String, Option<String>)>;

pub struct LibrarySettingsController<'a> {
    storage: &'a dyn StorageAdapter,
    gazetteer: &'a Gazetteer,
    lookup: &'a dyn PlaceLookup,
}

impl<'a> LibrarySettingsController<'a> {
    pub fn new(
        storage: &'a dyn StorageAdapter,
        gazetteer: &'a Gazetteer,
        lookup: &'a dyn PlaceLookup,
    ) -> Self {
        Self {
            storage,
            gazetteer,
            lookup,
        }
    }

    /// Every library the admin can see, with its stored settings.
    pub async fn process_get(&self, admin: &Admin) -> Result<Value, CirculateError> {
        let mut libraries = Vec::new();
        for library in self.storage.list_libraries().await? {
            if !admin.is_librarian(library.id) {
                continue;
            }
            let stored = self.storage.library_settings(library.id).await?;
            let mut settings = Map::new();
            for def in LIBRARY_SETTINGS {
                let Some(value) = stored.get(def.key) else {
                    continue;
                };
                let reported = if def.kind.is_json() {
                    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()))
                } else {
                    Value::String(value.clone())
                };
                settings.insert(def.key.to_string(), reported);
            }
            libraries.push(json!({
                "uuid": library.uuid,
                "name": library.name,
                "short_name": library.short_name,
                "settings": settings,
            }));
        }

        let definitions: Vec<Value> = LIBRARY_SETTINGS.iter().map(SettingDef::to_json).collect();
        Ok(json!({"libraries": libraries, "settings": definitions}))
    }

    /// Creates a library, or edits the one named by the form's `uuid`.
    pub async fn process_post(
        &self,
        admin: &Admin,
        form: &FormData,
    ) -> Result<Outcome, CirculateError> {
        let library = match form.value("uuid") {
            Some(uuid) => match self.storage.get_library_by_uuid(uuid).await? {
                Some(library) => Some(library),
                None => {
                    return Ok(LIBRARY_NOT_FOUND
                        .with_detail("The specified library uuid does not exist.")
                        .into());
                }
            },
            None => None,
        };

        let Some(short_name) = form
            .value("short_name")
            .or(library.as_ref().map(|l| l.short_name.as_str()))
        else {
            return Ok(MISSING_LIBRARY_SHORT_NAME.into());
        };
        let Some(name) = form
            .value("name")
            .or(library.as_ref().map(|l| l.name.as_str()))
        else {
            return Ok(MISSING_LIBRARY_NAME.into());
        };

        if let Some(other) = self.storage.get_library_by_short_name(short_name).await? {
            if library.as_ref().map(|l| l.id) != Some(other.id) {
                return Ok(LIBRARY_SHORT_NAME_ALREADY_IN_USE.into());
            }
        }

        match &library {
            Some(library) => admin.require_library_manager(library)?,
            None => admin.require_system_admin()?,
        }

        let settings = match self.settings_from_form(form).await {
            Ok(settings) => settings,
            Err(problem) => {
                debug!(problem = %problem.slug(), "library settings rejected");
                return Ok(problem.into());
            }
        };

        let write = LibraryWrite {
            uuid: library
                .as_ref()
                .map(|l| l.uuid.clone())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            short_name: short_name.to_string(),
            name: name.to_string(),
            settings,
        };

        let (saved, created, languages_changed) = match library {
            Some(existing) => {
                let changed = self.languages_changed(&existing, &write.settings).await?;
                let saved = self.storage.update_library(existing.id, &write).await?;
                (saved, false, changed)
            }
            None => (self.storage.create_library(&write).await?, true, true),
        };

        if languages_changed {
            let stored = self.storage.library_settings(saved.id).await?;
            let lanes = default_lanes_for_settings(&stored);
            self.storage.replace_lanes(saved.id, &lanes).await?;
            info!(library = %saved.short_name, lanes = lanes.len(), "default lanes created");
        }

        if created {
            info!(library = %saved.short_name, uuid = %saved.uuid, "library created");
            Ok(Outcome::Created(saved.uuid))
        } else {
            info!(library = %saved.short_name, uuid = %saved.uuid, "library updated");
            Ok(Outcome::Updated(saved.uuid))
        }
    }

    /// Deletes a library with its settings and lanes.
    pub async fn process_delete(
        &self,
        admin: &Admin,
        uuid: &str,
    ) -> Result<Outcome, CirculateError> {
        admin.require_system_admin()?;
        let Some(library) = self.storage.get_library_by_uuid(uuid).await? else {
            return Ok(LIBRARY_NOT_FOUND.into());
        };
        self.storage.delete_library(library.id).await?;
        info!(library = %library.short_name, "library deleted");
        Ok(Outcome::Deleted)
    }

    async fn languages_changed(
        &self,
        library: &Library,
        writes: &SettingWrites,
    ) -> Result<bool, CirculateError> {
        let before = self.storage.library_settings(library.id).await?;
        Ok(LANGUAGE_SETTINGS.iter().any(|key| {
            let after = writes
                .iter()
                .find(|(k, _)| k == *key)
                .and_then(|(_, v)| v.as_deref());
            after != before.get(*key).map(String::as_str)
        }))
    }

    /// Validates the form and returns the setting writes.
    ///
    /// Image settings with no upload are left out so the stored image is
    /// kept. Every other setting is written, so a setting missing from the
    /// form is cleared.
    async fn settings_from_form(&self, form: &FormData) -> Result<SettingWrites, ProblemDetail> {
        for def in LIBRARY_SETTINGS.iter().filter(|d| d.required) {
            if form.value(def.key).is_none() {
                return Err(INCOMPLETE_CONFIGURATION.with_detail(format!(
                    "The configuration is missing a required setting: {}",
                    def.label
                )));
            }
        }

        let mut writes = SettingWrites::new();
        for def in LIBRARY_SETTINGS {
            let value = match def.kind {
                SettingKind::Image => match form.file(def.key) {
                    Some(file) => Some(data_url(file)),
                    None => continue,
                },
                SettingKind::Menu(options) => {
                    let enabled: Vec<&str> = options
                        .iter()
                        .filter(|o| form.contains(&format!("{}_{}", def.key, o.key)))
                        .map(|o| o.key)
                        .collect();
                    json_list(&enabled)?
                }
                SettingKind::List | SettingKind::LanguageList => {
                    json_list(&list_entries(&form.get_all(def.key)))?
                }
                // Resolved last; they may call out to registries.
                SettingKind::GeographicArea => continue,
                _ => match form.value(def.key) {
                    Some(value) => {
                        validate_value(def, value)?;
                        Some(value.to_string())
                    }
                    None => None,
                },
            };
            writes.push((def.key.to_string(), value));
        }

        check_contrast(form)?;
        check_header_links(form)?;

        for def in LIBRARY_SETTINGS
            .iter()
            .filter(|d| matches!(d.kind, SettingKind::GeographicArea))
        {
            let entries = area_entries(&form.get_all(def.key));
            let value = if entries.is_empty() {
                None
            } else {
                Some(validate_geographic_areas(&entries, self.gazetteer, self.lookup).await?)
            };
            writes.push((def.key.to_string(), value));
        }

        Ok(writes)
    }
}

fn data_url(file: &UploadedFile) -> String {
    format!("data:{};base64,{}", file.content_type, BASE64.encode(&file.data))
}

fn list_entries(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}

fn json_list(items: &[&str]) -> Result<Option<String>, ProblemDetail> {
    if items.is_empty() {
        return Ok(None);
    }
    to_spaced_string(items)
        .map(Some)
        .map_err(|e| INVALID_CONFIGURATION_OPTION.with_detail(e.to_string()))
}

fn validate_value(def: &SettingDef, value: &str) -> Result<(), ProblemDetail> {
    match def.kind {
        SettingKind::Number { min, max } => {
            let Ok(number) = value.parse::<f64>() else {
                return Err(INVALID_CONFIGURATION_OPTION
                    .with_detail(format!("{} must be a number.", def.label)));
            };
            if let Some(min) = min.filter(|min| number < *min) {
                return Err(INVALID_CONFIGURATION_OPTION.with_detail(format!(
                    "{} must be greater than or equal to {min}.",
                    def.label
                )));
            }
            if let Some(max) = max.filter(|max| number > *max) {
                return Err(INVALID_CONFIGURATION_OPTION.with_detail(format!(
                    "{} must be less than or equal to {max}.",
                    def.label
                )));
            }
        }
        SettingKind::Url => {
            let valid = url::Url::parse(value)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
            if !valid {
                return Err(INVALID_CONFIGURATION_OPTION
                    .with_detail(format!("\"{value}\" is not a valid URL.")));
            }
        }
        SettingKind::Email => {
            if !EMAIL.is_match(value) {
                return Err(INVALID_CONFIGURATION_OPTION
                    .with_detail(format!("\"{value}\" is not a valid email address.")));
            }
        }
        SettingKind::Color => {
            if parse_hex_color(value).is_none() {
                return Err(INVALID_CONFIGURATION_OPTION
                    .with_detail(format!("\"{value}\" is not a valid color.")));
            }
        }
        SettingKind::Select(options) => {
            if !options.iter().any(|o| o.key == value) {
                return Err(INVALID_CONFIGURATION_OPTION.with_detail(format!(
                    "\"{value}\" is not a valid value for {}.",
                    def.label
                )));
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_contrast(form: &FormData) -> Result<(), ProblemDetail> {
    let background = form
        .value(WEB_BACKGROUND_COLOR)
        .unwrap_or(DEFAULT_WEB_BACKGROUND_COLOR);
    let foreground = form
        .value(WEB_FOREGROUND_COLOR)
        .unwrap_or(DEFAULT_WEB_FOREGROUND_COLOR);
    let (Some(bg), Some(fg)) = (parse_hex_color(background), parse_hex_color(foreground)) else {
        return Ok(());
    };
    if contrast_ratio(fg, bg) < MIN_CONTRAST_RATIO {
        return Err(INVALID_CONFIGURATION_OPTION.with_detail(format!(
            "The web background and foreground colors don't have enough contrast to pass the \
             WCAG 2.0 AA guidelines and will be difficult for some patrons to read. Check \
             contrast here: {}.",
            contrast_checker_url(foreground, background)
        )));
    }
    Ok(())
}

fn check_header_links(form: &FormData) -> Result<(), ProblemDetail> {
    let links = list_entries(&form.get_all(WEB_HEADER_LINKS)).len();
    let labels = list_entries(&form.get_all(WEB_HEADER_LABELS)).len();
    if links != labels {
        return Err(INVALID_CONFIGURATION_OPTION.with_detail(
            "There must be the same number of web header links and web header labels.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use circulate_core::Nation;
    use circulate_core::problem::{REMOTE_INTEGRATION_FAILED, UNKNOWN_LOCATION};
    use circulate_core::types::{AdminRole, RoleGrant};
    use circulate_test_utils::{MockPlaceLookup, TestHarness};

    fn required_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("website", "https://library.library/"),
            ("help-email", "help@example.com"),
            ("default_notification_email_address", "email@example.com"),
        ]
    }

    fn library_form(library: &Library, extra: &[(&str, &str)]) -> FormData {
        let mut form = FormData::from_pairs([
            ("uuid", library.uuid.as_str()),
            ("name", "The New York Public Library"),
            ("short_name", library.short_name.as_str()),
        ]);
        for (k, v) in required_fields() {
            form.push(k, v);
        }
        for (k, v) in extra {
            form.push(*k, *v);
        }
        form
    }

    async fn post(
        harness: &TestHarness,
        lookup: &MockPlaceLookup,
        admin: &Admin,
        form: &FormData,
    ) -> Result<Outcome, CirculateError> {
        let storage = harness.storage();
        let gazetteer = Gazetteer::embedded();
        LibrarySettingsController::new(storage.as_ref(), &gazetteer, lookup)
            .process_post(admin, form)
            .await
    }

    fn problem(outcome: &Outcome) -> &ProblemDetail {
        outcome.problem().expect("expected a problem detail")
    }

    #[tokio::test]
    async fn get_lists_visible_libraries_with_stored_settings() {
        let harness = TestHarness::new().await.unwrap();
        let l1 = harness.add_library("l1").await.unwrap();
        let l2 = harness
            .add_library_with_settings(
                "l2",
                &[
                    ("featured_lane_size", "5"),
                    ("facets_default_order", "random"),
                    ("facets_enabled_order", r#"["author", "title", "random"]"#),
                    ("large_collections", r#"["French"]"#),
                ],
            )
            .await
            .unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let storage = harness.storage();
        let gazetteer = Gazetteer::embedded();
        let lookup = MockPlaceLookup::new();
        let controller = LibrarySettingsController::new(storage.as_ref(), &gazetteer, &lookup);

        let response = controller.process_get(&admin).await.unwrap();
        let libraries = response["libraries"].as_array().unwrap();
        assert_eq!(libraries.len(), 2);
        assert_eq!(libraries[0]["uuid"], l1.uuid.as_str());
        assert_eq!(libraries[1]["uuid"], l2.uuid.as_str());
        assert_eq!(libraries[0]["settings"], json!({}));

        let settings = libraries[1]["settings"].as_object().unwrap();
        assert_eq!(settings.len(), 4);
        assert_eq!(settings["featured_lane_size"], "5");
        assert_eq!(settings["facets_default_order"], "random");
        assert_eq!(settings["facets_enabled_order"], json!(["author", "title", "random"]));
        assert_eq!(settings["large_collections"], json!(["French"]));
    }

    #[tokio::test]
    async fn get_hides_libraries_admin_cannot_see() {
        let harness = TestHarness::new().await.unwrap();
        let l1 = harness.add_library("l1").await.unwrap();
        harness.add_library("l2").await.unwrap();
        let (librarian, _) = harness
            .add_admin(
                "librarian@example.com",
                &[RoleGrant {
                    role: AdminRole::Librarian,
                    library_id: Some(l1.id),
                }],
            )
            .await
            .unwrap();
        let storage = harness.storage();
        let gazetteer = Gazetteer::embedded();
        let lookup = MockPlaceLookup::new();
        let controller = LibrarySettingsController::new(storage.as_ref(), &gazetteer, &lookup);

        let response = controller.process_get(&librarian).await.unwrap();
        let libraries = response["libraries"].as_array().unwrap();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0]["short_name"], "l1");
    }

    #[tokio::test]
    async fn unknown_uuid_is_library_not_found() {
        let harness = TestHarness::new().await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();
        let form = FormData::from_pairs([("uuid", "1234"), ("name", "x"), ("short_name", "x")]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert!(problem(&outcome).same_type(&LIBRARY_NOT_FOUND));
    }

    #[tokio::test]
    async fn new_library_needs_short_name_then_name() {
        let harness = TestHarness::new().await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = FormData::from_pairs([("name", "Brooklyn Public Library")]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(problem(&outcome), &MISSING_LIBRARY_SHORT_NAME);

        let form = FormData::from_pairs([("short_name", "bpl")]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(problem(&outcome), &MISSING_LIBRARY_NAME);
    }

    #[tokio::test]
    async fn short_name_must_be_unique() {
        let harness = TestHarness::new().await.unwrap();
        let nypl = harness.add_library("nypl").await.unwrap();
        let bpl = harness.add_library("bpl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = FormData::from_pairs([
            ("name", "Brooklyn Public Library"),
            ("short_name", "nypl"),
        ]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(problem(&outcome), &LIBRARY_SHORT_NAME_ALREADY_IN_USE);

        let form = FormData::from_pairs([
            ("uuid", bpl.uuid.as_str()),
            ("name", "Brooklyn Public Library"),
            ("short_name", nypl.short_name.as_str()),
        ]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(problem(&outcome), &LIBRARY_SHORT_NAME_ALREADY_IN_USE);
    }

    #[tokio::test]
    async fn create_requires_system_admin() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (manager, _) = harness
            .add_admin(
                "manager@example.com",
                &[RoleGrant {
                    role: AdminRole::LibraryManager,
                    library_id: Some(library.id),
                }],
            )
            .await
            .unwrap();
        let lookup = MockPlaceLookup::new();

        let mut form = FormData::from_pairs([("name", "Brooklyn"), ("short_name", "bpl")]);
        for (k, v) in required_fields() {
            form.push(k, v);
        }
        let err = post(&harness, &lookup, &manager, &form).await.unwrap_err();
        assert!(err.is_not_authorized());

        // A manager may edit their own library.
        let outcome = post(&harness, &lookup, &manager, &library_form(&library, &[]))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Updated(library.uuid.clone()));
    }

    #[tokio::test]
    async fn missing_required_setting_is_incomplete() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = FormData::from_pairs([
            ("uuid", library.uuid.as_str()),
            ("name", "The New York Public Library"),
            ("short_name", "nypl"),
        ]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert!(problem(&outcome).same_type(&INCOMPLETE_CONFIGURATION));
    }

    #[tokio::test]
    async fn low_contrast_colors_are_rejected() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = library_form(
            &library,
            &[
                ("web-background-color", "#000000"),
                ("web-foreground-color", "#010101"),
            ],
        );
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        let problem = problem(&outcome);
        assert!(problem.same_type(&INVALID_CONFIGURATION_OPTION));
        assert!(problem.detail.contains("contrast-ratio.com/#%23010101-on-%23000000"));
    }

    #[tokio::test]
    async fn header_links_and_labels_must_pair_up() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = library_form(
            &library,
            &[
                ("web-header-links", "http://library.com/1"),
                ("web-header-links", "http://library.com/2"),
                ("web-header-labels", "One"),
            ],
        );
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert!(problem(&outcome).same_type(&INVALID_CONFIGURATION_OPTION));
    }

    #[tokio::test]
    async fn invalid_values_are_rejected() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        for extra in [
            ("featured_lane_size", "many"),
            ("minimum_featured_quality", "2"),
            ("facets_default_order", "color"),
            ("web-background-color", "black"),
        ] {
            let form = library_form(&library, &[extra]);
            let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
            assert!(
                problem(&outcome).same_type(&INVALID_CONFIGURATION_OPTION),
                "{extra:?} should be rejected"
            );
        }

        let form = FormData::from_pairs([
            ("uuid", library.uuid.as_str()),
            ("name", "NYPL"),
            ("website", "not a url"),
            ("help-email", "help@example.com"),
            ("default_notification_email_address", "email@example.com"),
        ]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert!(problem(&outcome).detail.contains("not a valid URL"));
    }

    #[tokio::test]
    async fn service_area_problems_come_from_geographic_validation() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();

        let lookup = MockPlaceLookup::new();
        let form = library_form(&library, &[("service_area", "00000")]);
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(
            problem(&outcome),
            &UNKNOWN_LOCATION.with_detail("\"00000\" is not a valid U.S. zipcode.")
        );

        let failing = MockPlaceLookup::new().failing_with(
            REMOTE_INTEGRATION_FAILED
                .with_detail("Unable to contact the registry at https://registry_url."),
        );
        let form = library_form(&library, &[("service_area", "Ontario")]);
        let outcome = post(&harness, &failing, &admin, &form).await.unwrap();
        assert!(problem(&outcome).same_type(&REMOTE_INTEGRATION_FAILED));
        assert_eq!(failing.asked(), vec!["Ontario".to_string()]);
    }

    #[tokio::test]
    async fn create_stores_settings_and_default_lanes() {
        let harness = TestHarness::new().await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new().with_place("Ontario", Nation::CA);

        let mut form = FormData::from_pairs([
            ("name", "The New York Public Library"),
            ("short_name", "nypl"),
            ("library_description", "Short description of library"),
            ("tiny_collections", "ger"),
            ("service_area", "06759"),
            ("service_area", "everywhere"),
            ("service_area", "MD"),
            ("service_area", "Boston, MA"),
            ("focus_area", "V5K"),
            ("focus_area", "Broward County, FL"),
            ("focus_area", "QC"),
            ("focus_area", "Ontario"),
            ("featured_lane_size", "5"),
            ("facets_default_order", "random"),
            ("facets_enabled_order_title", ""),
            ("facets_enabled_order_random", ""),
        ]);
        for (k, v) in required_fields() {
            form.push(k, v);
        }
        let form = form.with_file(UploadedFile {
            field: "logo".into(),
            file_name: Some("logo.png".into()),
            content_type: "image/png".into(),
            data: b"\x89PNG image data".to_vec(),
        });

        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        let storage = harness.storage();
        let library = storage.get_library_by_short_name("nypl").await.unwrap().unwrap();
        assert_eq!(outcome, Outcome::Created(library.uuid.clone()));
        assert_eq!(library.name, "The New York Public Library");

        let settings = storage.library_settings(library.id).await.unwrap();
        assert_eq!(settings["featured_lane_size"], "5");
        assert_eq!(settings["facets_default_order"], "random");
        assert_eq!(settings["facets_enabled_order"], r#"["title", "random"]"#);
        assert_eq!(
            settings["logo"],
            format!("data:image/png;base64,{}", BASE64.encode(b"\x89PNG image data"))
        );
        assert_eq!(
            settings["service_area"],
            r#"{"CA": [], "US": [{"06759": "Litchfield, CT"}, "everywhere", "MD", "Boston, MA"]}"#
        );
        assert_eq!(
            settings["focus_area"],
            r#"{"CA": [{"V5K": "Vancouver (North Hastings- Sunrise), British Columbia"}, "QC", "Ontario"], "US": ["Broward County, FL"]}"#
        );
        assert_eq!(lookup.asked(), vec!["Ontario".to_string()]);

        let lanes = storage.lanes(library.id).await.unwrap();
        assert_eq!(lanes.len(), 2);
        let other = lanes.iter().find(|l| l.display_name == "Other Languages").unwrap();
        let german = lanes.iter().find(|l| l.display_name == "German").unwrap();
        assert_eq!(other.parent_id, None);
        assert_eq!(other.languages, vec!["ger".to_string()]);
        assert_eq!(german.parent_id, Some(other.id));
        assert_eq!(german.languages, vec!["ger".to_string()]);
    }

    #[tokio::test]
    async fn edit_replaces_settings_and_keeps_logo() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness
            .add_library_with_settings(
                "nypl",
                &[
                    ("featured_lane_size", "5"),
                    ("facets_default_order", "random"),
                    ("facets_enabled_order", r#"["author", "title", "random"]"#),
                    ("logo", "A tiny image"),
                    ("library_description", "Old description"),
                ],
            )
            .await
            .unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();

        let form = library_form(
            &library,
            &[
                ("featured_lane_size", "20"),
                ("minimum_featured_quality", "0.9"),
                ("facets_default_order", "author"),
                ("facets_enabled_order_author", ""),
                ("facets_enabled_order_random", ""),
            ],
        );
        let outcome = post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(outcome, Outcome::Updated(library.uuid.clone()));

        let storage = harness.storage();
        let edited = storage.get_library_by_uuid(&library.uuid).await.unwrap().unwrap();
        assert_eq!(edited.name, "The New York Public Library");
        assert_eq!(edited.short_name, "nypl");

        let settings = storage.library_settings(library.id).await.unwrap();
        assert_eq!(settings["website"], "https://library.library/");
        assert_eq!(settings["help-email"], "help@example.com");
        assert_eq!(settings["featured_lane_size"], "20");
        assert_eq!(settings["minimum_featured_quality"], "0.9");
        assert_eq!(settings["facets_default_order"], "author");
        assert_eq!(settings["facets_enabled_order"], r#"["author", "random"]"#);
        assert_eq!(settings["logo"], "A tiny image");
        assert!(!settings.contains_key("library_description"));
    }

    #[tokio::test]
    async fn language_change_regenerates_lanes() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let lookup = MockPlaceLookup::new();
        let storage = harness.storage();

        let form = library_form(&library, &[("large_collections", "spa")]);
        post(&harness, &lookup, &admin, &form).await.unwrap();
        let lanes = storage.lanes(library.id).await.unwrap();
        assert!(lanes.iter().any(|l| l.display_name == "Spanish" && l.parent_id.is_none()));

        // Same languages again: lanes are left alone.
        let before = storage.lanes(library.id).await.unwrap();
        post(&harness, &lookup, &admin, &form).await.unwrap();
        assert_eq!(storage.lanes(library.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_requires_system_admin() {
        let harness = TestHarness::new().await.unwrap();
        let library = harness.add_library("nypl").await.unwrap();
        let (manager, _) = harness
            .add_admin(
                "manager@example.com",
                &[RoleGrant {
                    role: AdminRole::LibraryManager,
                    library_id: Some(library.id),
                }],
            )
            .await
            .unwrap();
        let (admin, _) = harness.add_system_admin().await.unwrap();
        let storage = harness.storage();
        let gazetteer = Gazetteer::embedded();
        let lookup = MockPlaceLookup::new();
        let controller = LibrarySettingsController::new(storage.as_ref(), &gazetteer, &lookup);

        let err = controller
            .process_delete(&manager, &library.uuid)
            .await
            .unwrap_err();
        assert!(err.is_not_authorized());

        let outcome = controller.process_delete(&admin, &library.uuid).await.unwrap();
        assert_eq!(outcome, Outcome::Deleted);
        assert!(storage.get_library_by_uuid(&library.uuid).await.unwrap().is_none());

        let outcome = controller.process_delete(&admin, &library.uuid).await.unwrap();
        assert!(problem(&outcome).same_type(&LIBRARY_NOT_FOUND));
    }
}
