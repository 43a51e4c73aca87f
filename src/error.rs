//! Error types for connection construction and the bound transport handlers.
//!
//! Misconfigured environment values are never errors: they are clamped or
//! replaced by defaults and only show up in logs and metrics. What remains
//! here is the set of failures a caller has to act on.

use thiserror::Error;

/// Errors that can occur while building or using a connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint's authorization descriptor is missing a required field.
    #[error("endpoint misconfigured: {field} is missing or empty")]
    InvalidEndpoint { field: &'static str },

    /// The target address is empty or not an http(s) URL.
    #[error("invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A resolved setting cannot be rendered as an HTTP header.
    #[error("invalid {name} header: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    /// The underlying HTTP client failed to build or to send.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The server rejected the credential. Credentials never prompt, so this is final.
    #[error("request to {url} was rejected as unauthorized")]
    Unauthorized { url: String },

    /// A caller-supplied interceptor refused the request.
    #[error("interceptor '{name}' rejected request: {reason}")]
    Interceptor { name: String, reason: String },
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
