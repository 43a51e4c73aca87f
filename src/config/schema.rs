//! Configuration schema definitions.
//!
//! This module defines the startup configuration for the transport layer.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::config::env::DEFAULT_ENV_PREFIX;

/// Root configuration for the agent transport.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TransportConfig {
    /// Environment override settings.
    pub environment: EnvironmentConfig,

    /// Extra `User-Agent` tokens prepended for every connection flavor.
    pub user_agent: UserAgentConfig,

    /// Optional outbound web proxy.
    pub proxy: Option<ProxyConfig>,

    /// Backoff between retries performed by the transport handlers.
    pub retry: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Environment override configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Prefix of the override variables (`<prefix>_HTTP_RETRY`, ...).
    pub prefix: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

/// User agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Tokens in `name/version` or `(comment)` form.
    pub additional: Vec<String>,
}

/// Web proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Proxy URL (e.g., "http://proxy.internal:3128").
    pub url: String,

    /// Hosts that bypass the proxy.
    #[serde(default)]
    pub bypass: Vec<String>,
}

/// Retry backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
