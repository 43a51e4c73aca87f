//! Credential resolution.
//!
//! # Responsibilities
//! - Validate the authorization descriptor's required fields
//! - Map a supported scheme to a typed credential
//! - Render the credential as an `Authorization` header
//!
//! # Design Decisions
//! - Supported schemes form a closed enum; each variant has its own resolver
//! - Unsupported schemes resolve to no credential rather than an error
//! - Token material never appears in `Debug` output or logs

use reqwest::header::HeaderValue;

use crate::auth::descriptor::{parameters, EndpointAuthorization};
use crate::error::{Result, TransportError};

/// Authorization schemes this crate can turn into credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    OAuth,
}

impl AuthScheme {
    /// Parse a scheme name. Comparison is exact.
    pub fn parse(scheme: &str) -> Option<Self> {
        match scheme {
            "OAuth" => Some(AuthScheme::OAuth),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthScheme::OAuth => "OAuth",
        }
    }
}

/// A bearer access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Authentication material bound to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    OAuthAccessToken(AccessToken),
}

impl Credential {
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Credential::OAuthAccessToken(_) => AuthScheme::OAuth,
        }
    }

    /// The `Authorization` header value, marked sensitive.
    pub fn authorization_header(&self) -> Result<HeaderValue> {
        let raw = match self {
            Credential::OAuthAccessToken(token) => format!("Bearer {}", token.secret()),
        };
        let mut value = HeaderValue::from_str(&raw).map_err(|_| TransportError::InvalidHeader {
            name: "Authorization",
            reason: "access token contains characters not allowed in a header".to_string(),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Whether the transport may ask for fresh credentials on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PromptType {
    /// Rejections are final.
    DoNotPrompt,
}

/// A credential plus its prompting policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    credential: Credential,
    prompt: PromptType,
}

impl Credentials {
    pub fn new(credential: Credential, prompt: PromptType) -> Self {
        Self { credential, prompt }
    }

    /// The federated credential. Raw connections bind only this part.
    pub fn federated(&self) -> &Credential {
        &self.credential
    }

    pub fn prompt(&self) -> PromptType {
        self.prompt
    }
}

/// Resolve the credential described by an endpoint authorization.
///
/// Fails when the descriptor, its scheme or its parameters are missing.
/// Returns `Ok(None)` for unsupported schemes and for an OAuth descriptor
/// without an access token.
pub fn resolve_credential(
    authorization: Option<&EndpointAuthorization>,
) -> Result<Option<Credentials>> {
    let authorization = authorization.ok_or(TransportError::InvalidEndpoint {
        field: "authorization",
    })?;

    let scheme = authorization
        .scheme
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(TransportError::InvalidEndpoint {
            field: "authorization.scheme",
        })?;

    if authorization.parameters.is_empty() {
        return Err(TransportError::InvalidEndpoint {
            field: "authorization.parameters",
        });
    }

    let credentials = match AuthScheme::parse(scheme) {
        Some(AuthScheme::OAuth) => resolve_oauth(authorization),
        None => None,
    };

    if credentials.is_none() {
        tracing::debug!(scheme = %scheme, "No credential resolved for endpoint authorization");
    }

    Ok(credentials)
}

fn resolve_oauth(authorization: &EndpointAuthorization) -> Option<Credentials> {
    let token = authorization.parameter(parameters::ACCESS_TOKEN)?;
    Some(Credentials::new(
        Credential::OAuthAccessToken(AccessToken::new(token)),
        PromptType::DoNotPrompt,
    ))
}
