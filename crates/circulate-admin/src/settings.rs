// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Library setting definitions.
//!
//! Every setting the library controller reads from a form, validates, or
//! reports back is declared in [`LIBRARY_SETTINGS`].

use serde_json::{Value, json};

pub const WEBSITE_URL: &str = "website";
pub const HELP_EMAIL: &str = "help-email";
pub const DEFAULT_NOTIFICATION_EMAIL_ADDRESS: &str = "default_notification_email_address";
pub const WEB_BACKGROUND_COLOR: &str = "web-background-color";
pub const WEB_FOREGROUND_COLOR: &str = "web-foreground-color";
pub const WEB_HEADER_LINKS: &str = "web-header-links";
pub const WEB_HEADER_LABELS: &str = "web-header-labels";
pub const LOGO: &str = "logo";
pub const FEATURED_LANE_SIZE: &str = "featured_lane_size";
pub const MINIMUM_FEATURED_QUALITY: &str = "minimum_featured_quality";
pub const LIBRARY_DESCRIPTION: &str = "library_description";
pub const LARGE_COLLECTION_LANGUAGES: &str = "large_collections";
pub const SMALL_COLLECTION_LANGUAGES: &str = "small_collections";
pub const TINY_COLLECTION_LANGUAGES: &str = "tiny_collections";
pub const LIBRARY_SERVICE_AREA: &str = "service_area";
pub const LIBRARY_FOCUS_AREA: &str = "focus_area";

pub const DEFAULT_WEB_BACKGROUND_COLOR: &str = "#000000";
pub const DEFAULT_WEB_FOREGROUND_COLOR: &str = "#ffffff";

/// Prefix of the default facet setting for a facet group.
pub const DEFAULT_FACET_KEY_PREFIX: &str = "facets_default_";
/// Prefix of the enabled facets setting for a facet group.
pub const ENABLED_FACETS_KEY_PREFIX: &str = "facets_enabled_";

/// Settings whose change regenerates a library's default lanes.
pub const LANGUAGE_SETTINGS: [&str; 3] = [
    LARGE_COLLECTION_LANGUAGES,
    SMALL_COLLECTION_LANGUAGES,
    TINY_COLLECTION_LANGUAGES,
];

/// One selectable option of a select or menu setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingOption {
    pub key: &'static str,
    pub label: &'static str,
}

const fn option(key: &'static str, label: &'static str) -> SettingOption {
    SettingOption { key, label }
}

const ORDER_FACETS: &[SettingOption] = &[
    option("title", "Title"),
    option("author", "Author"),
    option("added", "Recently Added"),
    option("random", "Random"),
];

const AVAILABILITY_FACETS: &[SettingOption] = &[
    option("now", "Available now"),
    option("all", "All"),
    option("always", "Yours to keep"),
];

const COLLECTION_FACETS: &[SettingOption] = &[
    option("full", "Everything"),
    option("main", "Main Collection"),
    option("featured", "Popular Books"),
];

/// How a setting's form value is read, validated, and stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingKind {
    Text,
    TextArea,
    Number { min: Option<f64>, max: Option<f64> },
    Url,
    Email,
    Color,
    Select(&'static [SettingOption]),
    /// Repeated form values stored as a JSON list.
    List,
    /// Repeated ISO 639-2 codes stored as a JSON list.
    LanguageList,
    /// One checkbox per option (`<key>_<option>`) stored as a JSON list.
    Menu(&'static [SettingOption]),
    /// An uploaded file stored as a data URL.
    Image,
    /// Places stored as `{"CA": [...], "US": [...]}`.
    GeographicArea,
}

impl SettingKind {
    fn type_name(&self) -> &'static str {
        match self {
            SettingKind::Text => "text",
            SettingKind::TextArea => "textarea",
            SettingKind::Number { .. } => "number",
            SettingKind::Url => "url",
            SettingKind::Email => "email",
            SettingKind::Color => "color-picker",
            SettingKind::Select(_) => "select",
            SettingKind::List => "list",
            SettingKind::LanguageList => "language-list",
            SettingKind::Menu(_) => "menu",
            SettingKind::Image => "image",
            SettingKind::GeographicArea => "geographic",
        }
    }

    /// True for settings stored as JSON and decoded when reported.
    pub fn is_json(&self) -> bool {
        matches!(
            self,
            SettingKind::List
                | SettingKind::LanguageList
                | SettingKind::Menu(_)
                | SettingKind::GeographicArea
        )
    }

    fn options(&self) -> &'static [SettingOption] {
        match self {
            SettingKind::Select(options) | SettingKind::Menu(options) => options,
            _ => &[],
        }
    }
}

/// A library setting definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
    pub required: bool,
}

const fn setting(key: &'static str, label: &'static str, kind: SettingKind) -> SettingDef {
    SettingDef {
        key,
        label,
        kind,
        required: false,
    }
}

const fn required(key: &'static str, label: &'static str, kind: SettingKind) -> SettingDef {
    SettingDef {
        key,
        label,
        kind,
        required: true,
    }
}

impl SettingDef {
    /// The definition as reported to admin clients.
    pub fn to_json(&self) -> Value {
        let options: Vec<Value> = self
            .kind
            .options()
            .iter()
            .map(|o| json!({"key": o.key, "label": o.label}))
            .collect();
        let mut value = json!({
            "key": self.key,
            "label": self.label,
            "type": self.kind.type_name(),
            "required": self.required,
        });
        if !options.is_empty() {
            value["options"] = Value::Array(options);
        }
        value
    }
}

pub static LIBRARY_SETTINGS: &[SettingDef] = &[
    required(WEBSITE_URL, "URL of the library's website", SettingKind::Url),
    required(
        HELP_EMAIL,
        "Patron support email address",
        SettingKind::Email,
    ),
    required(
        DEFAULT_NOTIFICATION_EMAIL_ADDRESS,
        "Write-only email address for vendor hold notifications",
        SettingKind::Email,
    ),
    setting(
        LIBRARY_DESCRIPTION,
        "A short description of this library",
        SettingKind::TextArea,
    ),
    setting(
        WEB_BACKGROUND_COLOR,
        "Background color of the web catalog",
        SettingKind::Color,
    ),
    setting(
        WEB_FOREGROUND_COLOR,
        "Foreground color of the web catalog",
        SettingKind::Color,
    ),
    setting(
        WEB_HEADER_LINKS,
        "Web header links",
        SettingKind::List,
    ),
    setting(
        WEB_HEADER_LABELS,
        "Web header labels",
        SettingKind::List,
    ),
    setting(LOGO, "Logo image", SettingKind::Image),
    setting(
        FEATURED_LANE_SIZE,
        "Maximum number of books in the 'featured' lanes",
        SettingKind::Number {
            min: Some(1.0),
            max: None,
        },
    ),
    setting(
        MINIMUM_FEATURED_QUALITY,
        "Minimum quality for books that show up in 'featured' lanes",
        SettingKind::Number {
            min: Some(0.0),
            max: Some(1.0),
        },
    ),
    setting(
        "facets_default_order",
        "Default Sort by",
        SettingKind::Select(ORDER_FACETS),
    ),
    setting(
        "facets_enabled_order",
        "Allow patrons to sort by",
        SettingKind::Menu(ORDER_FACETS),
    ),
    setting(
        "facets_default_available",
        "Default Availability",
        SettingKind::Select(AVAILABILITY_FACETS),
    ),
    setting(
        "facets_enabled_available",
        "Allow patrons to filter availability to",
        SettingKind::Menu(AVAILABILITY_FACETS),
    ),
    setting(
        "facets_default_collection",
        "Default Collection",
        SettingKind::Select(COLLECTION_FACETS),
    ),
    setting(
        "facets_enabled_collection",
        "Allow patrons to filter collection to",
        SettingKind::Menu(COLLECTION_FACETS),
    ),
    setting(
        LARGE_COLLECTION_LANGUAGES,
        "The primary languages represented in this library's collection",
        SettingKind::LanguageList,
    ),
    setting(
        SMALL_COLLECTION_LANGUAGES,
        "Other major languages represented in this library's collection",
        SettingKind::LanguageList,
    ),
    setting(
        TINY_COLLECTION_LANGUAGES,
        "Other languages in this library's collection",
        SettingKind::LanguageList,
    ),
    setting(
        LIBRARY_SERVICE_AREA,
        "The library's service area",
        SettingKind::GeographicArea,
    ),
    setting(
        LIBRARY_FOCUS_AREA,
        "The library's focus area",
        SettingKind::GeographicArea,
    ),
];

/// Looks up a library setting definition by key.
pub fn library_setting(key: &str) -> Option<&'static SettingDef> {
    LIBRARY_SETTINGS.iter().find(|def| def.key == key)
}
