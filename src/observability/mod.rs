//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! settings resolver, connection factory, handlers produce:
//!     → tracing events (structured fields, never credential material)
//!     → metrics.rs (counters)
//!
//! Binaries:
//!     → logging.rs (subscriber + env filter)
//! ```

pub mod logging;
pub mod metrics;
