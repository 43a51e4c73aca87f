//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries built on this crate
//! - Honor `RUST_LOG` first, then the configured level
//!
//! The library itself only emits events; it never installs a subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("runner_transport={level},transport_probe={level}")
}

/// Install a global fmt subscriber. Calling it twice is a no-op.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
