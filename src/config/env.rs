//! Environment overrides.
//!
//! # Responsibilities
//! - Abstract environment lookup so resolution can be tested without
//!   touching the process environment
//! - Derive the override variable names from a configurable prefix
//! - Lenient parsing: anything unparsable reads as "absent"

use std::collections::HashMap;

/// Default prefix for every override variable.
pub const DEFAULT_ENV_PREFIX: &str = "GITHUB_ACTIONS_RUNNER";

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Look up a variable. Unset and non-UTF-8 values both read as `None`.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Names of the override variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNames {
    pub http_retry: String,
    pub http_timeout: String,
    pub tls_no_verify: String,
}

impl EnvNames {
    /// Build the variable names for a prefix, e.g. `RUNNER` → `RUNNER_HTTP_RETRY`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            http_retry: format!("{}_HTTP_RETRY", prefix),
            http_timeout: format!("{}_HTTP_TIMEOUT", prefix),
            tls_no_verify: format!("{}_TLS_NO_VERIFY", prefix),
        }
    }
}

impl Default for EnvNames {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }
}

/// Read a 32-bit integer override. Surrounding whitespace and a leading sign
/// are accepted; values outside `i32` read as absent.
pub fn read_int(env: &dyn EnvSource, key: &str) -> Option<i32> {
    env.var(key)?.trim().parse::<i32>().ok()
}

/// Read a boolean-like override: `1`, `true`, `$true` are true, everything else false.
pub fn read_bool(env: &dyn EnvSource, key: &str) -> bool {
    env.var(key)
        .map(|value| parse_bool(&value).unwrap_or(false))
        .unwrap_or(false)
}

/// Parse a boolean-like string. Returns `None` when the value is not recognized.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "$true" => Some(true),
        "0" | "false" | "$false" => Some(false),
        _ => None,
    }
}
