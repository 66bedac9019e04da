//! API gateway custom authorizer.
//!
//! Validates an RS256 bearer token against a remote JWKS and the audience read
//! from a managed secret, and answers with an allow or deny policy for the
//! requested method.

pub use self::builder::AuthorizerBuilder;
pub use self::error::{AuthError, HandlerError};
pub use handler::{AuthorizerEvent, GatewayAuthorizer};
pub use jwks::key_store_manager::{Refresh, RefreshStrategy};
pub use policy::{build_policy, AuthorizerResponse, Effect};

pub mod builder;
pub mod claims;
pub mod config;
pub mod error;
pub mod handler;
pub mod jwks;
pub mod policy;
pub mod secrets;
pub mod validation;
pub mod verifier;
