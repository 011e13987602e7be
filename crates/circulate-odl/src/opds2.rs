// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic OPDS 2.0 importer.

use async_trait::async_trait;
use circulate_core::CirculateError;
use circulate_core::metadata::{FormatData, LinkData, Medium, Metadata, rights};

use crate::feed::{Contributor, Feed, Link, Publication, Subject, rels};
use crate::importer::FeedImporter;

const SCHEMA_AUDIOBOOK: &str = "http://schema.org/Audiobook";
const SCHEMA_BOOK: &str = "http://schema.org/Book";
const SCHEMA_EBOOK: &str = "http://schema.org/EBook";

/// Extracts bibliographic metadata from OPDS 2.0 publications.
#[derive(Debug, Clone)]
pub struct Opds2Importer {
    data_source: String,
}

impl Opds2Importer {
    pub fn new(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
        }
    }

    /// Maps a publication's metadata, images, and acquisition links.
    ///
    /// Fails only when the publication has no identifier.
    pub fn extract(
        &self,
        publication: &Publication,
        data_source: &str,
    ) -> Result<Metadata, CirculateError> {
        let meta = &publication.metadata;
        let identifier = meta
            .identifier
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CirculateError::Feed {
                message: "publication has no identifier".into(),
                source: None,
            })?;

        let mut metadata = Metadata {
            data_source: data_source.to_string(),
            primary_identifier: identifier.to_string(),
            title: meta.title.as_ref().and_then(|t| t.text()).map(str::to_string),
            subtitle: meta
                .subtitle
                .as_ref()
                .and_then(|t| t.text())
                .map(str::to_string),
            language: meta.language.first().cloned(),
            publisher: meta
                .publisher
                .first()
                .and_then(Contributor::name)
                .map(str::to_string),
            published: meta.published.clone(),
            medium: medium_from_schema_type(meta.schema_type.as_deref()),
            authors: meta
                .author
                .iter()
                .filter_map(Contributor::name)
                .map(str::to_string)
                .collect(),
            subjects: meta
                .subject
                .iter()
                .filter_map(Subject::name)
                .map(str::to_string)
                .collect(),
            description: meta.description.clone(),
            ..Metadata::default()
        };

        for (index, image) in publication.images.iter().enumerate() {
            let rel = if index == 0 { rels::IMAGE } else { rels::THUMBNAIL };
            metadata.links.push(link_data(rel, image));
        }

        for link in publication.links.iter().filter(|l| l.is_acquisition()) {
            let rel = link
                .rel
                .iter()
                .find(|r| r.starts_with(rels::ACQUISITION))
                .map(String::as_str)
                .unwrap_or(rels::ACQUISITION);
            metadata.links.push(link_data(rel, link));

            if link.has_rel(rels::OPEN_ACCESS) {
                metadata.circulation.formats.push(FormatData {
                    content_type: link.media_type.clone(),
                    drm_scheme: None,
                    rights_uri: rights::UNKNOWN.to_string(),
                });
            }
            if metadata.medium.is_none() {
                metadata.medium = link.media_type.as_deref().and_then(Medium::from_media_type);
            }
        }

        Ok(metadata)
    }
}

#[async_trait]
impl FeedImporter for Opds2Importer {
    fn data_source(&self) -> &str {
        &self.data_source
    }

    async fn extract_publication_metadata(
        &self,
        _feed: &Feed,
        publication: &Publication,
        data_source: &str,
    ) -> Result<Metadata, CirculateError> {
        self.extract(publication, data_source)
    }
}

fn medium_from_schema_type(schema_type: Option<&str>) -> Option<Medium> {
    match schema_type? {
        SCHEMA_AUDIOBOOK => Some(Medium::Audio),
        SCHEMA_BOOK | SCHEMA_EBOOK => Some(Medium::Book),
        _ => None,
    }
}

fn link_data(rel: &str, link: &Link) -> LinkData {
    LinkData {
        rel: rel.to_string(),
        href: link.href.clone(),
        media_type: link.media_type.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn publication(value: serde_json::Value) -> Publication {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn extracts_bibliographic_fields() {
        let publication = publication(json!({
            "metadata": {
                "@type": "http://schema.org/Book",
                "identifier": "urn:isbn:9780000000001",
                "title": "Moby-Dick",
                "subtitle": "or, The Whale",
                "language": ["en", "fr"],
                "author": {"name": "Herman Melville"},
                "publisher": "Harper & Brothers",
                "published": "1851-10-18",
                "subject": ["Fiction"],
                "description": "A whale of a tale."
            },
            "images": [
                {"href": "https://covers/1.jpg", "type": "image/jpeg"},
                {"href": "https://covers/1-small.jpg", "type": "image/jpeg"}
            ]
        }));

        let metadata = Opds2Importer::new("Feed")
            .extract(&publication, "Feed")
            .unwrap();
        assert_eq!(metadata.primary_identifier, "urn:isbn:9780000000001");
        assert_eq!(metadata.data_source, "Feed");
        assert_eq!(metadata.title.as_deref(), Some("Moby-Dick"));
        assert_eq!(metadata.subtitle.as_deref(), Some("or, The Whale"));
        assert_eq!(metadata.language.as_deref(), Some("en"));
        assert_eq!(metadata.authors, ["Herman Melville"]);
        assert_eq!(metadata.publisher.as_deref(), Some("Harper & Brothers"));
        assert_eq!(metadata.medium, Some(Medium::Book));
        assert_eq!(metadata.links[0].rel, rels::IMAGE);
        assert_eq!(metadata.links[1].rel, rels::THUMBNAIL);
    }

    #[test]
    fn open_access_links_become_formats() {
        let publication = publication(json!({
            "metadata": {"identifier": "oa-1", "title": "Free"},
            "links": [
                {"rel": "http://opds-spec.org/acquisition/open-access",
                 "href": "https://files/free.epub", "type": "application/epub+zip"},
                {"rel": "alternate", "href": "https://site/free"}
            ]
        }));

        let metadata = Opds2Importer::new("Feed")
            .extract(&publication, "Feed")
            .unwrap();
        assert_eq!(metadata.links.len(), 1);
        assert_eq!(metadata.links[0].rel, rels::OPEN_ACCESS);
        assert_eq!(metadata.circulation.formats.len(), 1);
        assert_eq!(
            metadata.circulation.formats[0].content_type.as_deref(),
            Some("application/epub+zip")
        );
        assert_eq!(metadata.medium, Some(Medium::Book));
    }

    #[test]
    fn missing_identifier_is_feed_error() {
        let publication = publication(json!({"metadata": {"title": "Anonymous"}}));
        let err = Opds2Importer::new("Feed")
            .extract(&publication, "Feed")
            .unwrap_err();
        assert!(matches!(err, CirculateError::Feed { .. }));
    }
}
