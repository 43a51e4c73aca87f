//! Transport policy and credential resolution for a runner talking to its
//! control plane over HTTPS.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod settings;

pub use auth::{resolve_credential, Credential, Credentials, EndpointAuthorization, ServiceEndpoint};
pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use net::{Connection, ConnectionFactory, RawConnection};
pub use settings::{TransportDefaults, TransportSettings};
