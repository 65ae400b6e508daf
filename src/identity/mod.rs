//! Caller identity.
//!
//! The guard only needs to know whether a request is anonymous; the host
//! site also uses the resolved name for its own read checks.

pub mod token;

use axum::http::HeaderMap;
use thiserror::Error;

pub use token::TokenIdentityProvider;

/// User name that stands for unauthenticated callers in ACLs.
pub const ANONYMOUS: &str = "anonymous";

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(String),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn name(&self) -> &str {
        match self {
            Identity::Anonymous => ANONYMOUS,
            Identity::User(name) => name,
        }
    }
}

/// The identity backend could not answer.
///
/// Credentials the provider cannot authenticate are not an error: the
/// caller is anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the identity attached to a request.
///
/// Implementations are called on the response path and must not block.
/// Missing, malformed or unrecognised credentials resolve to
/// [`Identity::Anonymous`]; `Err` is reserved for the provider itself
/// failing.
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, headers: &HeaderMap) -> Result<Identity, IdentityError>;

    fn is_anonymous(&self, headers: &HeaderMap) -> Result<bool, IdentityError> {
        Ok(self.identify(headers)?.is_anonymous())
    }
}
