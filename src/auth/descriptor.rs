//! Endpoint authorization descriptors as delivered by the control plane.

use std::collections::HashMap;

use serde::Deserialize;

use crate::auth::credential::{resolve_credential, Credentials};
use crate::error::Result;

/// Well-known authorization parameter names.
pub mod parameters {
    pub const ACCESS_TOKEN: &str = "AccessToken";
}

/// Scheme plus loosely typed parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointAuthorization {
    pub scheme: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl EndpointAuthorization {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter. Keys compare case-insensitively.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// A configured service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub url: String,
    pub authorization: Option<EndpointAuthorization>,
}

impl ServiceEndpoint {
    /// Resolve the credential for this endpoint.
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        resolve_credential(self.authorization.as_ref())
    }
}
