//! Connection factory.
//!
//! # Responsibilities
//! - Validate the target address
//! - Resolve per-connection settings from the shared baseline
//! - Bind settings, credential and interceptors into a handler
//!
//! No network I/O happens here; construction always completes immediately.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::auth::credential::Credentials;
use crate::config::env::{EnvNames, EnvSource, ProcessEnv};
use crate::config::schema::TransportConfig;
use crate::error::{Result, TransportError};
use crate::net::connection::{Connection, ConnectionId, RawConnection};
use crate::net::handler::{ClientHandler, RawHandler};
use crate::net::interceptor::Interceptor;
use crate::observability::metrics::{self, Flavor};
use crate::settings::defaults::TransportDefaults;
use crate::settings::resolver::resolve_settings;
use crate::settings::transport::TransportSettings;

/// Builds connections from an injected, read-only baseline.
#[derive(Clone)]
pub struct ConnectionFactory {
    defaults: Arc<TransportDefaults>,
    env: Arc<dyn EnvSource>,
    names: EnvNames,
}

impl ConnectionFactory {
    pub fn new(defaults: Arc<TransportDefaults>, env: Arc<dyn EnvSource>, names: EnvNames) -> Self {
        Self {
            defaults,
            env,
            names,
        }
    }

    /// Factory reading overrides from the process environment.
    pub fn from_config(defaults: Arc<TransportDefaults>, config: &TransportConfig) -> Self {
        Self::new(
            defaults,
            Arc::new(ProcessEnv),
            EnvNames::with_prefix(&config.environment.prefix),
        )
    }

    pub fn defaults(&self) -> &TransportDefaults {
        &self.defaults
    }

    /// Resolved settings for a structured client connection.
    pub fn client_settings(&self, timeout: Option<Duration>) -> TransportSettings {
        resolve_settings(&self.defaults.client, self.env.as_ref(), &self.names, timeout)
    }

    /// Resolved settings for a raw streaming connection.
    pub fn raw_settings(&self, timeout: Option<Duration>) -> TransportSettings {
        resolve_settings(&self.defaults.raw, self.env.as_ref(), &self.names, timeout)
    }

    /// Create a structured client connection.
    pub fn create_connection(
        &self,
        address: &str,
        credentials: Option<Credentials>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        timeout: Option<Duration>,
    ) -> Result<Connection> {
        let url = parse_address(address)?;
        let settings = self.client_settings(timeout);
        let id = ConnectionId::new();
        log_created(id, Flavor::Client, &url, &settings, credentials.is_some(), interceptors.len());

        let handler = ClientHandler::new(id, settings, credentials, interceptors)?;
        metrics::record_connection_created(Flavor::Client);
        Ok(Connection::new(url, handler))
    }

    /// Create a raw streaming connection. Only the federated credential is bound.
    pub fn create_raw_connection(
        &self,
        address: &str,
        credentials: Option<Credentials>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        timeout: Option<Duration>,
    ) -> Result<RawConnection> {
        let url = parse_address(address)?;
        let settings = self.raw_settings(timeout);
        let id = ConnectionId::new();
        log_created(id, Flavor::Raw, &url, &settings, credentials.is_some(), interceptors.len());

        let credential = credentials.map(|c| c.federated().clone());
        let handler = RawHandler::new(id, settings, credential, interceptors)?;
        metrics::record_connection_created(Flavor::Raw);
        Ok(RawConnection::new(url, handler))
    }
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("defaults", &self.defaults)
            .field("names", &self.names)
            .finish()
    }
}

fn log_created(
    id: ConnectionId,
    flavor: Flavor,
    url: &Url,
    settings: &TransportSettings,
    authenticated: bool,
    interceptors: usize,
) {
    if !authenticated {
        tracing::debug!(
            connection_id = %id,
            flavor = %flavor,
            address = %url,
            "Creating connection without a credential"
        );
    }
    tracing::debug!(
        connection_id = %id,
        flavor = %flavor,
        address = %url,
        max_retry = settings.max_retry,
        send_timeout_secs = settings.send_timeout.as_secs(),
        tls_verification_disabled = settings.tls_verification_disabled,
        interceptors,
        "Creating connection"
    );
}

/// Validate a server address: non-empty, absolute, http or https.
pub fn parse_address(address: &str) -> Result<Url> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(TransportError::InvalidAddress {
            address: address.to_string(),
            reason: "address is empty".to_string(),
        });
    }

    let url = Url::parse(trimmed).map_err(|e| TransportError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
