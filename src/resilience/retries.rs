//! Retry classification.
//!
//! # Responsibilities
//! - Decide whether a failed attempt may be repeated
//!
//! # Design Decisions
//! - A request is only resent when its body could be cloned up front
//! - Connection errors and timeouts are always retryable
//! - 401 is never retried: credentials do not prompt, so a retry cannot succeed

use reqwest::StatusCode;

/// Status codes worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Whether a transport error is transient.
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}
