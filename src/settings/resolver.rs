//! Per-connection settings resolution.
//!
//! # Precedence
//! ```text
//! retry:   env HTTP_RETRY (i32) ────┐
//!          else 3 ──────────────────┴→ clamp [3, 10]
//!
//! timeout: env HTTP_TIMEOUT (i32)   → clamp [100s, 1200s]
//!          else explicit argument    → as given
//!          else 100s
//! ```
//!
//! # Design Decisions
//! - Never fails: malformed overrides degrade to defaults
//! - Only the environment timeout is clamped; the explicit argument passes through
//! - Every fallback is logged and counted, never returned

use std::time::Duration;

use crate::config::env::{read_int, EnvNames, EnvSource};
use crate::observability::metrics;
use crate::settings::transport::{
    TransportSettings, DEFAULT_RETRY, DEFAULT_TIMEOUT, MAX_RETRY, MAX_TIMEOUT_SECS, MIN_RETRY,
    MIN_TIMEOUT_SECS,
};

/// Resolve the settings for one connection from a baseline.
pub fn resolve_settings(
    baseline: &TransportSettings,
    env: &dyn EnvSource,
    names: &EnvNames,
    explicit_timeout: Option<Duration>,
) -> TransportSettings {
    let mut settings = baseline.clone();

    settings.max_retry = resolve_max_retry(env, &names.http_retry);
    settings.send_timeout = resolve_send_timeout(env, &names.http_timeout, explicit_timeout);

    // An invariant locale serializes to an empty Accept-Language entry.
    if settings.remove_invariant_locale() {
        tracing::debug!("Removed invariant locale from accepted languages");
    }

    settings
}

fn resolve_max_retry(env: &dyn EnvSource, key: &str) -> u32 {
    let requested = match read_int(env, key) {
        Some(value) => i64::from(value),
        None => {
            if env.var(key).is_some() {
                defaulted(key, "unparsable value, using default retry count");
            }
            i64::from(DEFAULT_RETRY)
        }
    };

    let clamped = requested.clamp(i64::from(MIN_RETRY), i64::from(MAX_RETRY));
    if clamped != requested {
        defaulted(key, "retry count clamped into range");
    }
    // Clamped into [3, 10], so the conversion is lossless.
    clamped as u32
}

fn resolve_send_timeout(
    env: &dyn EnvSource,
    key: &str,
    explicit_timeout: Option<Duration>,
) -> Duration {
    match read_int(env, key).map(i64::from) {
        Some(secs) => {
            let clamped = secs.clamp(MIN_TIMEOUT_SECS as i64, MAX_TIMEOUT_SECS as i64);
            if clamped != secs {
                defaulted(key, "send timeout clamped into range");
            }
            Duration::from_secs(clamped as u64)
        }
        None => {
            if env.var(key).is_some() {
                defaulted(key, "unparsable value, ignoring timeout override");
            }
            explicit_timeout.unwrap_or(DEFAULT_TIMEOUT)
        }
    }
}

fn defaulted(variable: &str, message: &'static str) {
    tracing::debug!(variable = %variable, "{}", message);
    metrics::record_setting_defaulted(variable);
}
