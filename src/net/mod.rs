//! Connection construction subsystem.
//!
//! # Data Flow
//! ```text
//! address + Option<Credentials> + interceptors + explicit timeout
//!     → factory.rs (validate address, resolve settings per flavor)
//!     → handler.rs (reqwest client + credential + retry loop)
//!     → connection.rs (Connection | RawConnection)
//!
//! Per request (inside the handler):
//!     interceptor.rs (in order) → Authorization header → send
//!     → on transient failure: backoff, resend (up to max_retry)
//! ```
//!
//! # Design Decisions
//! - Both flavors share settings resolution; their handler types are distinct
//! - The baseline is only read; each connection gets its own clone

pub mod connection;
pub mod factory;
pub mod handler;
pub mod interceptor;

pub use connection::{Connection, ConnectionId, RawConnection};
pub use factory::ConnectionFactory;
pub use handler::{ClientHandler, RawHandler};
pub use interceptor::{Interceptor, RequestIdInterceptor};
