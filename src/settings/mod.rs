//! Transport settings subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     TransportConfig + platform + environment
//!     → defaults.rs (compose user agents, proxy, TLS posture)
//!     → Arc<TransportDefaults> (read-only from here on)
//!
//! Per connection:
//!     baseline flavor (client | raw)
//!     → resolver.rs (clone, retry/timeout overrides, locale cleanup)
//!     → TransportSettings (immutable, bound to a handler)
//! ```

pub mod defaults;
pub mod locale;
pub mod resolver;
pub mod transport;

pub use defaults::TransportDefaults;
pub use locale::Locale;
pub use resolver::resolve_settings;
pub use transport::{BackoffPolicy, TransportSettings, WebProxy};
