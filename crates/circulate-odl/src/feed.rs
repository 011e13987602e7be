// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde model of OPDS 2.0 feeds with the ODL license extension.
//!
//! The model is lenient: unknown members are ignored, and members that OPDS2
//! allows as either a single value or an array are always exposed as `Vec`s.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Link relations used by the importers.
pub mod rels {
    pub const SELF: &str = "self";
    pub const NEXT: &str = "next";
    pub const BORROW: &str = "http://opds-spec.org/acquisition/borrow";
    pub const ACQUISITION: &str = "http://opds-spec.org/acquisition";
    pub const OPEN_ACCESS: &str = "http://opds-spec.org/acquisition/open-access";
    pub const IMAGE: &str = "http://opds-spec.org/image";
    pub const THUMBNAIL: &str = "http://opds-spec.org/image/thumbnail";
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

/// A string that may be given per language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedString {
    /// The plain value, the English value, or the first value by language tag.
    pub fn text(&self) -> Option<&str> {
        match self {
            LocalizedString::Plain(s) => Some(s),
            LocalizedString::Localized(map) => map
                .get("en")
                .or_else(|| map.values().next())
                .map(String::as_str),
        }
    }
}

/// A contributor given either by name or as an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Contributor {
    Name(String),
    Object {
        name: LocalizedString,
        #[serde(default, rename = "sortAs")]
        sort_as: Option<String>,
    },
}

impl Contributor {
    pub fn name(&self) -> Option<&str> {
        match self {
            Contributor::Name(name) => Some(name),
            Contributor::Object { name, .. } => name.text(),
        }
    }
}

/// A subject given either by name or as an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Name(String),
    Object {
        name: LocalizedString,
        #[serde(default)]
        scheme: Option<String>,
        #[serde(default)]
        code: Option<String>,
    },
}

impl Subject {
    pub fn name(&self) -> Option<&str> {
        match self {
            Subject::Name(name) => Some(name),
            Subject::Object { name, .. } => name.text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub rel: Vec<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Link {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.iter().any(|r| r == rel)
    }

    /// True for any acquisition relation (borrow, open-access, buy, ...).
    pub fn is_acquisition(&self) -> bool {
        self.rel.iter().any(|r| r.starts_with(rels::ACQUISITION))
    }
}

/// Returns the first link carrying `rel`.
pub fn first_by_rel<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|link| link.has_rel(rel))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "numberOfItems")]
    pub number_of_items: Option<u64>,
}

/// An OPDS 2.0 feed page.
///
/// Publications stay raw JSON and are parsed one at a time, so a malformed
/// entry only fails itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub metadata: FeedMetadata,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub publications: Vec<Value>,
}

impl Feed {
    /// The `next` page link, if any.
    pub fn next_link(&self) -> Option<&str> {
        first_by_rel(&self.links, rels::NEXT).map(|link| link.href.as_str())
    }
}

/// The `metadata.identifier` of a raw publication, if it has one.
pub fn raw_identifier(publication: &Value) -> Option<&str> {
    publication.pointer("/metadata/identifier").and_then(Value::as_str)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PublicationMetadata {
    #[serde(default, rename = "@type")]
    pub schema_type: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub title: Option<LocalizedString>,
    #[serde(default)]
    pub subtitle: Option<LocalizedString>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub language: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Vec<Contributor>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub publisher: Vec<Contributor>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub subject: Vec<Subject>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub metadata: PublicationMetadata,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub images: Vec<Link>,
    #[serde(default)]
    pub licenses: Vec<License>,
}

/// An ODL license offered for a publication.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct License {
    pub metadata: LicenseMetadata,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LicenseMetadata {
    pub identifier: String,
    #[serde(default, alias = "formats", deserialize_with = "one_or_many")]
    pub format: Vec<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub terms: Option<LicenseTerms>,
    #[serde(default)]
    pub protection: Option<Protection>,
}

/// License terms. Numeric terms are kept as raw JSON so that a malformed
/// value does not reject the whole feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LicenseTerms {
    #[serde(default)]
    pub checkouts: Option<Value>,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub concurrency: Option<Value>,
    #[serde(default)]
    pub length: Option<Value>,
}

/// DRM protection declared by a license.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Protection {
    #[serde(default, alias = "formats", deserialize_with = "one_or_many")]
    pub format: Vec<String>,
}

/// Reads a count from a JSON value holding an integer or a numeric string.
pub fn as_count(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an OPDS 2.0 feed document.
pub fn parse_feed(text: &str) -> Result<Feed, serde_json::Error> {
    serde_json::from_str(text)
}
