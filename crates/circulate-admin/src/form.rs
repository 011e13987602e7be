// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin form submissions.
//!
//! Admin clients post either `application/x-www-form-urlencoded` or
//! `multipart/form-data`. Both arrive as a [`FormData`] holding repeated
//! text fields in submission order plus any uploaded files.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use circulate_core::problem::INVALID_INPUT;

use crate::response::Problem;

/// A file uploaded through a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A submitted admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<UploadedFile>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a form from text fields, keeping repeated keys.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            files: Vec::new(),
        }
    }

    /// Parses an urlencoded body.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(body).into_owned())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.files.push(file);
        self
    }

    /// The first value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The first value for `key`, trimmed, or `None` when blank.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Every value submitted for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key) || self.file(key).is_some()
    }

    /// The file uploaded under `field`, if any.
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let body = Bytes::from_request(req, state).await.map_err(|e| {
                Problem(INVALID_INPUT.with_detail(format!("Unable to read the form: {e}")))
            })?;
            return Ok(FormData::from_urlencoded(&body));
        }

        let mut multipart = Multipart::from_request(req, state).await.map_err(|e| {
            Problem(INVALID_INPUT.with_detail(format!("Unable to read the form: {e}")))
        })?;
        let mut form = FormData::new();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            Problem(INVALID_INPUT.with_detail(format!("Unable to read the form: {e}")))
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            if file_name.is_none() {
                let text = field.text().await.map_err(|e| {
                    Problem(INVALID_INPUT.with_detail(format!("Unable to read field {name}: {e}")))
                })?;
                form.push(name, text);
                continue;
            }

            let data = field.bytes().await.map_err(|e| {
                Problem(INVALID_INPUT.with_detail(format!("Unable to read file {name}: {e}")))
            })?;
            // Browsers send an empty part for file inputs left blank.
            if data.is_empty() {
                continue;
            }
            form.files.push(UploadedFile {
                field: name,
                file_name,
                content_type: content_type.unwrap_or_else(|| "application/octet-stream".into()),
                data: data.to_vec(),
            });
        }
        Ok(form)
    }
}
