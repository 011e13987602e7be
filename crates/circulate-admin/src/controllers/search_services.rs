// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sitewide search service integrations.

use axum::http::Method;
use circulate_core::problem::{
    CANNOT_CHANGE_PROTOCOL, INCOMPLETE_CONFIGURATION, INTEGRATION_NAME_ALREADY_IN_USE,
    MISSING_SERVICE, MISSING_SERVICE_NAME, MULTIPLE_SITEWIDE_SERVICES,
    NO_PROTOCOL_FOR_NEW_SERVICE, UNKNOWN_PROTOCOL,
};
use circulate_core::types::{IntegrationWrite, goals, protocols};
use circulate_core::{Admin, CirculateError, ExternalIntegration, StorageAdapter};
use serde_json::{Value, json};
use tracing::info;

use crate::form::FormData;
use crate::response::Outcome;

/// A setting a search protocol accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolSetting {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// A search integration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProtocol {
    pub name: &'static str,
    pub label: &'static str,
    pub sitewide: bool,
    pub allows_multiple: bool,
    pub settings: &'static [ProtocolSetting],
}

impl SearchProtocol {
    fn to_json(&self) -> Value {
        let settings: Vec<Value> = self
            .settings
            .iter()
            .map(|s| {
                json!({
                    "key": s.key,
                    "label": s.label,
                    "required": s.required,
                    "default": s.default,
                })
            })
            .collect();
        json!({
            "name": self.name,
            "label": self.label,
            "sitewide": self.sitewide,
            "allows_multiple": self.allows_multiple,
            "settings": settings,
        })
    }
}

pub const WORKS_INDEX_PREFIX: &str = "works_index_prefix";
pub const TEST_SEARCH_TERM: &str = "test_search_term";

pub static SEARCH_PROTOCOLS: &[SearchProtocol] = &[SearchProtocol {
    name: protocols::ELASTICSEARCH,
    label: "Elasticsearch",
    sitewide: true,
    allows_multiple: false,
    settings: &[
        ProtocolSetting {
            key: ExternalIntegration::URL,
            label: "URL",
            required: true,
            default: None,
        },
        ProtocolSetting {
            key: WORKS_INDEX_PREFIX,
            label: "Prefix for the works index",
            required: true,
            default: None,
        },
        ProtocolSetting {
            key: TEST_SEARCH_TERM,
            label: "Test search term",
            required: false,
            default: Some("test"),
        },
    ],
}];

pub fn search_protocol(name: &str) -> Option<&'static SearchProtocol> {
    SEARCH_PROTOCOLS.iter().find(|p| p.name == name)
}

pub struct SearchServicesController<'a> {
    storage: &'a dyn StorageAdapter,
}

impl<'a> SearchServicesController<'a> {
    pub fn new(storage: &'a dyn StorageAdapter) -> Self {
        Self { storage }
    }

    /// Lists search services on GET; creates or edits one otherwise.
    pub async fn process_search_services(
        &self,
        admin: &Admin,
        method: &Method,
        form: &FormData,
    ) -> Result<Outcome, CirculateError> {
        admin.require_system_admin()?;
        if *method == Method::POST {
            self.process_post(form).await
        } else {
            self.process_get().await.map(Outcome::Json)
        }
    }

    async fn process_get(&self) -> Result<Value, CirculateError> {
        let services: Vec<Value> = self
            .storage
            .list_integrations(Some(goals::SEARCH))
            .await?
            .into_iter()
            .map(|integration| {
                json!({
                    "id": integration.id,
                    "name": integration.name,
                    "protocol": integration.protocol,
                    "settings": integration.settings,
                })
            })
            .collect();
        let known: Vec<Value> = SEARCH_PROTOCOLS.iter().map(SearchProtocol::to_json).collect();
        Ok(json!({"search_services": services, "protocols": known}))
    }

    async fn process_post(&self, form: &FormData) -> Result<Outcome, CirculateError> {
        let protocol = form.value("protocol");
        if let Some(protocol) = protocol {
            if search_protocol(protocol).is_none() {
                return Ok(UNKNOWN_PROTOCOL.into());
            }
        }

        let Some(name) = form.value("name") else {
            return Ok(MISSING_SERVICE_NAME.into());
        };

        let existing = match form.value("id") {
            Some(id) => match self.search_integration(id).await? {
                Some(integration) => Some(integration),
                None => return Ok(MISSING_SERVICE.into()),
            },
            None => None,
        };

        let protocol = match (&existing, protocol) {
            (Some(existing), Some(protocol)) if existing.protocol != protocol => {
                return Ok(CANNOT_CHANGE_PROTOCOL.into());
            }
            (Some(existing), _) => existing.protocol.as_str(),
            (None, Some(protocol)) => protocol,
            (None, None) => return Ok(NO_PROTOCOL_FOR_NEW_SERVICE.into()),
        };
        let Some(definition) = search_protocol(protocol) else {
            return Ok(UNKNOWN_PROTOCOL.into());
        };

        if existing.is_none() && !definition.allows_multiple {
            let configured = self
                .storage
                .integrations_for(definition.name, goals::SEARCH)
                .await?;
            if !configured.is_empty() {
                return Ok(MULTIPLE_SITEWIDE_SERVICES.into());
            }
        }

        if let Some(other) = self.storage.find_integration_by_name(name).await? {
            if existing.as_ref().map(|e| e.id) != Some(other.id) {
                return Ok(INTEGRATION_NAME_ALREADY_IN_USE.into());
            }
        }

        let mut settings = Vec::new();
        for setting in definition.settings {
            let value = form.value(setting.key).or(setting.default);
            if setting.required && value.is_none() {
                return Ok(INCOMPLETE_CONFIGURATION
                    .with_detail(format!(
                        "The configuration is missing a required setting: {}",
                        setting.label
                    ))
                    .into());
            }
            settings.push((setting.key.to_string(), value.map(str::to_string)));
        }

        let write = IntegrationWrite {
            protocol: definition.name.to_string(),
            goal: goals::SEARCH.to_string(),
            name: Some(name.to_string()),
            settings,
        };
        match existing {
            Some(existing) => {
                let saved = self.storage.update_integration(existing.id, &write).await?;
                info!(id = saved.id, name = %name, "search service updated");
                Ok(Outcome::Updated(saved.id.to_string()))
            }
            None => {
                let saved = self.storage.create_integration(&write).await?;
                info!(id = saved.id, name = %name, protocol = %saved.protocol, "search service created");
                Ok(Outcome::Created(saved.id.to_string()))
            }
        }
    }

    /// Deletes a search service and its settings.
    pub async fn delete_search_service(
        &self,
        admin: &Admin,
        id: &str,
    ) -> Result<Outcome, CirculateError> {
        admin.require_system_admin()?;
        let Some(integration) = self.search_integration(id).await? else {
            return Ok(MISSING_SERVICE.into());
        };
        self.storage.delete_integration(integration.id).await?;
        info!(id = integration.id, "search service deleted");
        Ok(Outcome::Deleted)
    }

    async fn search_integration(
        &self,
        id: &str,
    ) -> Result<Option<ExternalIntegration>, CirculateError> {
        let Ok(id) = id.trim().parse::<i64>() else {
            return Ok(None);
        };
        Ok(self
            .storage
            .get_integration(id)
            .await?
            .filter(|integration| integration.goal == goals::SEARCH))
    }
}
