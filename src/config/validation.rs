//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TransportConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::TransportConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("environment.prefix must be non-empty and contain only A-Z, 0-9 and '_' (got '{0}')")]
    InvalidEnvPrefix(String),

    #[error("user_agent.additional[{0}] is empty")]
    EmptyUserAgent(usize),

    #[error("proxy.url '{url}' is invalid: {reason}")]
    InvalidProxyUrl { url: String, reason: String },

    #[error("retry.base_delay_ms ({base}) exceeds retry.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &TransportConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.environment.prefix;
    if prefix.is_empty()
        || !prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        errors.push(ValidationError::InvalidEnvPrefix(prefix.clone()));
    }

    for (i, token) in config.user_agent.additional.iter().enumerate() {
        if token.trim().is_empty() {
            errors.push(ValidationError::EmptyUserAgent(i));
        }
    }

    if let Some(proxy) = &config.proxy {
        match Url::parse(&proxy.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "socks5" | "socks5h") => {}
            Ok(url) => errors.push(ValidationError::InvalidProxyUrl {
                url: proxy.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidProxyUrl {
                url: proxy.url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base: config.retry.base_delay_ms,
            max: config.retry.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
