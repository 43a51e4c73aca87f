//! HTTP identity subsystem.
//!
//! # Data Flow
//! ```text
//! configured tokens + platform.rs (OS description)
//!     → user_agent.rs (sanitize, compose, dedup per flavor)
//!     → TransportDefaults.{client,raw}.user_agent
//!     → rendered into the User-Agent header by the handler
//! ```

pub mod platform;
pub mod user_agent;

pub use platform::{PlatformInfo, StaticPlatform, SystemPlatform};
pub use user_agent::{compose_user_agent, sanitize_comment, UserAgentToken};
