//! Transport handlers: settings and credential bound onto a `reqwest::Client`.
//!
//! # Responsibilities
//! - Translate `TransportSettings` into client configuration
//! - Run interceptors, attach the credential
//! - Own the retry loop, driven by the resolved `max_retry`
//!
//! # Design Decisions
//! - Two handler types share one core; the raw handler only ever sees the
//!   federated credential
//! - `max_retry` counts retries, so a request is attempted at most `max_retry + 1` times
//! - 401 ends the request immediately: credentials never prompt
//! - Interceptors and the credential are applied once; retries resend a clone
//!   of the prepared request

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode, Url};

use crate::auth::credential::{Credential, Credentials};
use crate::error::{Result, TransportError};
use crate::http::user_agent::render_user_agent;
use crate::net::connection::ConnectionId;
use crate::net::interceptor::Interceptor;
use crate::observability::metrics::{self, Flavor};
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{is_retryable_error, is_retryable_status};
use crate::settings::transport::TransportSettings;

/// Build the HTTP client for a set of resolved settings.
pub fn build_client(settings: &TransportSettings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if !settings.accept_languages.is_empty() {
        let joined = settings
            .accept_languages
            .iter()
            .map(|locale| locale.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let value = HeaderValue::from_str(&joined).map_err(|e| TransportError::InvalidHeader {
            name: "Accept-Language",
            reason: e.to_string(),
        })?;
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    let mut builder = Client::builder()
        .timeout(settings.send_timeout)
        .user_agent(render_user_agent(&settings.user_agent)?)
        .default_headers(headers)
        .danger_accept_invalid_certs(settings.tls_verification_disabled);

    builder = match &settings.proxy {
        Some(proxy) => builder.proxy(proxy.to_reqwest()?),
        None => builder.no_proxy(),
    };

    Ok(builder.build()?)
}

/// Shared state and retry loop of both handler flavors.
struct HandlerCore {
    connection_id: ConnectionId,
    client: Client,
    settings: TransportSettings,
    credential: Option<Credential>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    flavor: Flavor,
}

impl HandlerCore {
    fn new(
        connection_id: ConnectionId,
        settings: TransportSettings,
        credential: Option<Credential>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        flavor: Flavor,
    ) -> Result<Self> {
        let client = build_client(&settings)?;
        Ok(Self {
            connection_id,
            client,
            settings,
            credential,
            interceptors,
            flavor,
        })
    }

    fn prepare(&self, mut request: Request) -> Result<Request> {
        for interceptor in &self.interceptors {
            interceptor
                .on_request(&mut request)
                .map_err(|reason| TransportError::Interceptor {
                    name: interceptor.name().to_string(),
                    reason,
                })?;
        }
        if let Some(credential) = &self.credential {
            request
                .headers_mut()
                .insert(AUTHORIZATION, credential.authorization_header()?);
        }
        Ok(request)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let url = request.url().to_string();
        let method = request.method().clone();

        let mut current = self.prepare(request)?;
        // Streaming bodies cannot be cloned and are sent exactly once.
        let template = current.try_clone();
        let mut attempt: u32 = 1;

        loop {
            let retry = if attempt <= self.settings.max_retry {
                template.as_ref().and_then(Request::try_clone)
            } else {
                None
            };

            match self.client.execute(current).await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::UNAUTHORIZED {
                        tracing::warn!(
                            connection_id = %self.connection_id,
                            method = %method,
                            url = %url,
                            "Request rejected as unauthorized"
                        );
                        return Err(TransportError::Unauthorized { url });
                    }
                    match retry {
                        Some(next) if is_retryable_status(status) => {
                            let reason = status.to_string();
                            self.wait_before_retry(attempt, &method, &url, &reason).await;
                            current = next;
                        }
                        _ => return Ok(response),
                    }
                }
                Err(error) => match retry {
                    Some(next) if is_retryable_error(&error) => {
                        let reason = error.to_string();
                        self.wait_before_retry(attempt, &method, &url, &reason).await;
                        current = next;
                    }
                    _ => {
                        tracing::error!(
                            connection_id = %self.connection_id,
                            method = %method,
                            url = %url,
                            attempt,
                            error = %error,
                            "Request failed"
                        );
                        return Err(error.into());
                    }
                },
            }
            attempt += 1;
        }
    }

    async fn wait_before_retry(&self, attempt: u32, method: &Method, url: &str, reason: &str) {
        let delay = calculate_backoff(attempt, &self.settings.backoff);
        tracing::info!(
            connection_id = %self.connection_id,
            flavor = %self.flavor,
            method = %method,
            url = %url,
            attempt,
            max_retry = self.settings.max_retry,
            delay = ?delay,
            reason = %reason,
            "Retrying request"
        );
        metrics::record_retry(self.flavor);
        tokio::time::sleep(delay).await;
    }
}

/// Handler for structured client connections.
pub struct ClientHandler {
    core: HandlerCore,
    credentials: Option<Credentials>,
}

impl ClientHandler {
    pub fn new(
        connection_id: ConnectionId,
        settings: TransportSettings,
        credentials: Option<Credentials>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Self> {
        let credential = credentials.as_ref().map(|c| c.federated().clone());
        let core = HandlerCore::new(
            connection_id,
            settings,
            credential,
            interceptors,
            Flavor::Client,
        )?;
        Ok(Self { core, credentials })
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.core.connection_id
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.core.settings
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.core.client.request(method, url)
    }

    pub async fn send(&self, request: Request) -> Result<Response> {
        self.core.execute(request).await
    }
}

/// Handler for raw streaming connections.
pub struct RawHandler {
    core: HandlerCore,
}

impl RawHandler {
    pub fn new(
        connection_id: ConnectionId,
        settings: TransportSettings,
        credential: Option<Credential>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Self> {
        Ok(Self {
            core: HandlerCore::new(connection_id, settings, credential, interceptors, Flavor::Raw)?,
        })
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.core.connection_id
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.core.settings
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.core.credential.as_ref()
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.core.client.request(method, url)
    }

    pub async fn send(&self, request: Request) -> Result<Response> {
        self.core.execute(request).await
    }
}

impl std::fmt::Debug for ClientHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandler")
            .field("connection_id", &self.core.connection_id)
            .field("max_retry", &self.core.settings.max_retry)
            .field("send_timeout", &self.core.settings.send_timeout)
            .field("authenticated", &self.credentials.is_some())
            .field("interceptors", &self.core.interceptors.len())
            .finish()
    }
}

impl std::fmt::Debug for RawHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawHandler")
            .field("connection_id", &self.core.connection_id)
            .field("max_retry", &self.core.settings.max_retry)
            .field("send_timeout", &self.core.settings.send_timeout)
            .field("authenticated", &self.core.credential.is_some())
            .field("interceptors", &self.core.interceptors.len())
            .finish()
    }
}
