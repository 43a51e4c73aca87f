//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TransportConfig (validated, immutable)
//!     → TransportDefaults::from_config (baseline, shared via Arc)
//!
//! Per connection:
//!     env.rs (HTTP_RETRY / HTTP_TIMEOUT / TLS_NO_VERIFY overrides)
//!     → settings resolver (clamp, default, never fail)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Environment is read through a trait so tests never mutate the process

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{EnvNames, EnvSource, ProcessEnv};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ProxyConfig, RetryConfig, TransportConfig};
