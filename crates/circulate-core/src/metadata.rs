// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata-layer types produced by feed importers.
//!
//! Importers translate feed-specific schemas into these types and hand them to
//! an [`crate::ImportPipeline`], which owns persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Rights status URIs.
pub mod rights {
    pub const IN_COPYRIGHT: &str = "http://librarysimplified.org/terms/rights-status/in-copyright";
    pub const UNKNOWN: &str = "http://librarysimplified.org/terms/rights-status/unknown";
}

/// The kind of work a publication is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Medium {
    Book,
    Audio,
    Video,
}

impl Medium {
    /// Infers a medium from a media type, ignoring media type parameters.
    ///
    /// Returns `None` for media types that do not identify a medium.
    pub fn from_media_type(media_type: &str) -> Option<Medium> {
        let base = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match base.as_str() {
            "application/audiobook+json"
            | "application/audiobook+lcp"
            | "application/vnd.librarysimplified.findaway.license+json" => Some(Medium::Audio),
            "application/epub+zip"
            | "application/pdf"
            | "application/webpub+json"
            | "application/x-mobipocket-ebook"
            | "application/kepub+zip"
            | "text/html" => Some(Medium::Book),
            _ if base.starts_with("audio/") => Some(Medium::Audio),
            _ if base.starts_with("video/") => Some(Medium::Video),
            _ => None,
        }
    }
}

/// A link attached to a publication (cover image, open-access download, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkData {
    pub rel: String,
    pub href: String,
    pub media_type: Option<String>,
}

/// One deliverable format: content type, DRM scheme, and rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatData {
    pub content_type: Option<String>,
    pub drm_scheme: Option<String>,
    pub rights_uri: String,
}

/// Terms and status of a single lending license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseData {
    pub identifier: String,
    pub checkout_url: Option<String>,
    pub status_url: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub remaining_checkouts: Option<i64>,
    pub concurrent_checkouts: Option<i64>,
}

/// Circulation information for a publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationData {
    pub licenses_owned: i64,
    pub licenses_available: i64,
    pub licenses: Vec<LicenseData>,
    pub formats: Vec<FormatData>,
}

/// Bibliographic and circulation metadata for one publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub data_source: String,
    pub primary_identifier: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<String>,
    pub medium: Option<Medium>,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub description: Option<String>,
    pub links: Vec<LinkData>,
    pub circulation: CirculationData,
}
