//! Caller-supplied request interceptors.
//!
//! Interceptors run in the order they were given, before the credential is
//! attached, once per request. Retries resend the prepared request, so every
//! attempt carries the same headers (including one `x-request-id`).

use reqwest::header::HeaderValue;
use reqwest::Request;
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Hook applied to each outgoing request.
pub trait Interceptor: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Inspect or modify the request. An `Err` aborts the send with the given reason.
    fn on_request(&self, request: &mut Request) -> Result<(), String>;
}

/// Stamps `X-Request-Id` with a fresh UUID v4 unless one is already present.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdInterceptor;

impl Interceptor for RequestIdInterceptor {
    fn name(&self) -> &str {
        "request-id"
    }

    fn on_request(&self, request: &mut Request) -> Result<(), String> {
        if request.headers().contains_key(X_REQUEST_ID) {
            return Ok(());
        }
        let id = Uuid::new_v4().to_string();
        let value = HeaderValue::from_str(&id).map_err(|e| e.to_string())?;
        request.headers_mut().insert(X_REQUEST_ID, value);
        Ok(())
    }
}
