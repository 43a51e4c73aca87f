//! Metrics collection.
//!
//! # Metrics
//! - `transport_connections_created_total` (counter): connections built, by flavor
//! - `transport_settings_defaulted_total` (counter): overrides clamped or ignored, by variable
//! - `transport_request_retries_total` (counter): handler retries, by flavor
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; installing an exporter is
//!   left to the host process
//! - Label values are bounded (flavor names, variable names)

use metrics::counter;

/// Connection flavor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Client,
    Raw,
}

impl Flavor {
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Client => "client",
            Flavor::Raw => "raw",
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record a constructed connection.
pub fn record_connection_created(flavor: Flavor) {
    counter!("transport_connections_created_total", "flavor" => flavor.as_str()).increment(1);
}

/// Record an environment override that was clamped or ignored.
pub fn record_setting_defaulted(variable: &str) {
    counter!("transport_settings_defaulted_total", "variable" => variable.to_string()).increment(1);
}

/// Record a retry performed by a transport handler.
pub fn record_retry(flavor: Flavor) {
    counter!("transport_request_retries_total", "flavor" => flavor.as_str()).increment(1);
}
