//! Resilience subsystem used by the transport handlers.
//!
//! # Data Flow
//! ```text
//! Attempt fails:
//!     → retries.rs (is the status / error transient)
//!     → handler (can the request body be cloned for a resend)
//!     → backoff.rs (exponential delay with jitter)
//!     → next attempt, up to the resolved max_retry
//! ```

pub mod backoff;
pub mod retries;
