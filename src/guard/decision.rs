//! Challenge decision for outgoing statuses.

use std::fmt;

use axum::http::StatusCode;

/// The principal a challenge is raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// The permission that was nominally missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Read => f.write_str("read"),
        }
    }
}

/// Signal substituted for a not-found response. The host pipeline turns it
/// into a login challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationRequired {
    pub principal: Principal,
    pub permission: Permission,
}

impl AuthenticationRequired {
    /// Anonymous caller lacking read access.
    pub const fn anonymous_read() -> Self {
        Self {
            principal: Principal::Anonymous,
            permission: Permission::Read,
        }
    }
}

impl fmt::Display for AuthenticationRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is missing the {} permission", self.principal, self.permission)
    }
}

/// What the pipeline must do with an intercepted response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The status was delegated to the underlying response unchanged.
    PassThrough,
    /// The status was withheld; challenge the caller instead.
    Challenge(AuthenticationRequired),
}

impl ResponseOutcome {
    pub fn is_challenge(&self) -> bool {
        matches!(self, ResponseOutcome::Challenge(_))
    }
}

/// Whether an attempted status must be replaced by a login challenge.
///
/// True only for a 404 sent to an anonymous caller while the filter is
/// enabled and security is enforced. Every other status, 403 included,
/// passes through.
pub fn should_challenge(
    attempted_status: StatusCode,
    is_anonymous: bool,
    security_enforced: bool,
    filter_enabled: bool,
) -> bool {
    filter_enabled
        && security_enforced
        && is_anonymous
        && attempted_status == StatusCode::NOT_FOUND
}
