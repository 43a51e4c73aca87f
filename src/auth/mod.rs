//! Authorization subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceEndpoint { authorization: { scheme, parameters } }
//!     → credential.rs (validate required fields, match scheme)
//!     → Option<Credentials> (None = unauthenticated, caller decides)
//!     → bound into a transport handler
//! ```

pub mod credential;
pub mod descriptor;

pub use credential::{
    resolve_credential, AccessToken, AuthScheme, Credential, Credentials, PromptType,
};
pub use descriptor::{EndpointAuthorization, ServiceEndpoint};
