//! Connection handles.
//!
//! # Responsibilities
//! - Pair a target address with its bound transport handler
//! - Generate unique connection IDs, carried by every handler log event
//! - Offer structured (JSON) calls on `Connection` and streaming calls on
//!   `RawConnection`

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::{Body, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, TransportError};
use crate::net::handler::{ClientHandler, RawHandler};
use crate::settings::transport::TransportSettings;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough: only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Join a relative path onto the connection address.
///
/// The address is treated as a directory, so `https://host/api` + `jobs`
/// yields `https://host/api/jobs`.
pub fn resolve_url(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| TransportError::InvalidAddress {
            address: format!("{}{}", base, path),
            reason: e.to_string(),
        })
}

/// A structured client connection.
#[derive(Debug)]
pub struct Connection {
    address: Url,
    handler: ClientHandler,
}

impl Connection {
    pub(crate) fn new(address: Url, handler: ClientHandler) -> Self {
        Self { address, handler }
    }

    pub fn id(&self) -> ConnectionId {
        self.handler.connection_id()
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn settings(&self) -> &TransportSettings {
        self.handler.settings()
    }

    pub fn handler(&self) -> &ClientHandler {
        &self.handler
    }

    /// Send a body-less request and return the response whatever its status.
    pub async fn send(&self, method: Method, path: &str) -> Result<Response> {
        let url = resolve_url(&self.address, path)?;
        let request = self.handler.request(method, url).build()?;
        self.handler.send(request).await
    }

    /// GET a JSON document. Non-success statuses are errors.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path).await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body and decode the JSON reply. Non-success statuses are errors.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = resolve_url(&self.address, path)?;
        let request = self.handler.request(Method::POST, url).json(body).build()?;
        let response = self.handler.send(request).await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

/// A raw streaming connection.
#[derive(Debug)]
pub struct RawConnection {
    address: Url,
    handler: RawHandler,
}

impl RawConnection {
    pub(crate) fn new(address: Url, handler: RawHandler) -> Self {
        Self { address, handler }
    }

    pub fn id(&self) -> ConnectionId {
        self.handler.connection_id()
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn settings(&self) -> &TransportSettings {
        self.handler.settings()
    }

    pub fn handler(&self) -> &RawHandler {
        &self.handler
    }

    /// Send a request with an optional in-memory body.
    pub async fn send(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<Response> {
        let url = resolve_url(&self.address, path)?;
        let mut builder = self.handler.request(method, url);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.handler.send(builder.build()?).await
    }

    /// GET a resource and return its body as a byte stream.
    pub async fn stream(&self, path: &str) -> Result<impl Stream<Item = Result<Bytes>>> {
        let response = self.send(Method::GET, path, None).await?.error_for_status()?;
        Ok(response.bytes_stream().map_err(TransportError::from))
    }

    /// Upload a body. Streaming bodies cannot be replayed and are sent once.
    pub async fn upload(
        &self,
        method: Method,
        path: &str,
        body: impl Into<Body>,
    ) -> Result<Response> {
        let url = resolve_url(&self.address, path)?;
        let request = self.handler.request(method, url).body(body).build()?;
        let response = self.handler.send(request).await?.error_for_status()?;
        Ok(response)
    }
}
