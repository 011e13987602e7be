// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Problem details returned by the admin controllers.
//!
//! A problem detail is a structured, non-exceptional validation result with a
//! type URI, an HTTP status code, a short title, and a human-readable detail.
//! Each catalog constant carries a default detail; [`ProblemDetail::with_detail`]
//! produces a copy with a request-specific message.

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};

const PROBLEM_BASE: &str = "https://circulate.dev/terms/problem/";

/// A structured error value (type URI, status code, title, detail).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemDetail {
    pub uri: &'static str,
    pub status_code: u16,
    pub title: &'static str,
    pub detail: Cow<'static, str>,
}

impl ProblemDetail {
    /// Returns a copy of this problem with a different detail message.
    pub fn with_detail(&self, detail: impl Into<String>) -> Self {
        Self {
            detail: Cow::Owned(detail.into()),
            ..self.clone()
        }
    }

    /// True if both problems share a type URI, whatever their details.
    pub fn same_type(&self, other: &ProblemDetail) -> bool {
        self.uri == other.uri
    }

    /// The problem type URI with the shared base stripped.
    pub fn slug(&self) -> &str {
        self.uri.strip_prefix(PROBLEM_BASE).unwrap_or(self.uri)
    }
}

impl std::fmt::Display for ProblemDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.title, self.status_code, self.detail)
    }
}

impl Serialize for ProblemDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("type", self.uri)?;
        map.serialize_entry("title", self.title)?;
        map.serialize_entry("status", &self.status_code)?;
        map.serialize_entry("detail", &self.detail)?;
        map.end()
    }
}

macro_rules! problem {
    ($name:ident, $slug:literal, $status:literal, $title:literal, $detail:literal) => {
        pub const $name: ProblemDetail = ProblemDetail {
            uri: concat!("https://circulate.dev/terms/problem/", $slug),
            status_code: $status,
            title: $title,
            detail: Cow::Borrowed($detail),
        };
    };
}

problem!(
    ADMIN_NOT_AUTHORIZED,
    "admin-not-authorized",
    401,
    "Admin not authorized",
    "Your admin account is not authorized to make this request."
);
problem!(
    INTERNAL_SERVER_ERROR,
    "internal-server-error",
    500,
    "Internal server error",
    "The server could not complete the request."
);
problem!(
    INVALID_INPUT,
    "invalid-input",
    400,
    "Invalid input",
    "The submitted form could not be understood."
);
problem!(
    MISSING_LIBRARY_NAME,
    "missing-library-name",
    400,
    "Missing library name",
    "You must give this library a name."
);
problem!(
    MISSING_LIBRARY_SHORT_NAME,
    "missing-library-short-name",
    400,
    "Missing library short name",
    "You must set a short name for the library."
);
problem!(
    LIBRARY_SHORT_NAME_ALREADY_IN_USE,
    "library-short-name-already-in-use",
    400,
    "Library short name already in use",
    "The library short name must be unique, and there's already a library with the specified short name."
);
problem!(
    LIBRARY_NOT_FOUND,
    "library-not-found",
    404,
    "Library not found",
    "No library with the specified identifier was found."
);
problem!(
    INCOMPLETE_CONFIGURATION,
    "incomplete-configuration",
    400,
    "Incomplete configuration",
    "The configuration is missing a required field."
);
problem!(
    INVALID_CONFIGURATION_OPTION,
    "invalid-configuration-option",
    400,
    "Invalid configuration option",
    "The configuration has an invalid value."
);
problem!(
    NOT_FOUND,
    "not-found",
    404,
    "Not found",
    "The requested record does not exist."
);
problem!(
    UNKNOWN_LOCATION,
    "unknown-location",
    400,
    "Unknown location",
    "The submitted geographic location cannot be found."
);
problem!(
    REMOTE_INTEGRATION_FAILED,
    "remote-integration-failed",
    502,
    "Remote integration failed",
    "The remote service did not respond to our request."
);
problem!(
    UNKNOWN_PROTOCOL,
    "unknown-protocol",
    400,
    "Unknown protocol",
    "The protocol is not one of the known protocols."
);
problem!(
    NO_PROTOCOL_FOR_NEW_SERVICE,
    "no-protocol-for-new-service",
    400,
    "No protocol for new service",
    "The specified service doesn't exist. You can create it, but you must specify a protocol."
);
problem!(
    MISSING_SERVICE,
    "missing-service",
    404,
    "Missing service",
    "The specified service doesn't exist."
);
problem!(
    MISSING_SERVICE_NAME,
    "missing-service-name",
    400,
    "Missing service name",
    "You must identify the service by its name."
);
problem!(
    CANNOT_CHANGE_PROTOCOL,
    "cannot-change-protocol",
    400,
    "Cannot change protocol",
    "A protocol can't be changed once it has been set."
);
problem!(
    MULTIPLE_SITEWIDE_SERVICES,
    "multiple-sitewide-services",
    400,
    "Multiple sitewide services",
    "You tried to create a new sitewide service, but a sitewide service of the same type is already configured."
);
problem!(
    INTEGRATION_NAME_ALREADY_IN_USE,
    "integration-name-already-in-use",
    400,
    "Integration name already in use",
    "The integration name must be unique, and there's already an integration with the specified name."
);
