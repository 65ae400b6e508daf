//! Not-found guard.
//!
//! Keeps anonymous callers from telling "does not exist" apart from "exists
//! but you may not see it": a 404 meant for an anonymous caller is replaced
//! by an [`AuthenticationRequired`] outcome, which the HTTP layer turns into
//! a login challenge. Authenticated callers always get their 404.

pub mod decision;
pub mod interceptor;
pub mod store;

pub use decision::{
    should_challenge, AuthenticationRequired, Permission, Principal, ResponseOutcome,
};
pub use interceptor::{InterceptedResponse, RequestContext, ResponseChannel, ResponseInterceptor};
pub use store::{FilterConfig, StoreError};
