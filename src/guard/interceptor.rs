//! Response interception.
//!
//! # Data Flow
//! ```text
//! request start
//!     → ResponseInterceptor::context_for (enabled? enforced? who is calling?)
//!     → None: downstream writes to the real response
//!     → Some(context): downstream writes to InterceptedResponse
//!           every status-setting call → should_challenge
//!               false → delegated to the real response
//!               true  → withheld, challenge recorded
//!     → ResponseOutcome for the pipeline
//! ```

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};

use crate::guard::decision::{should_challenge, AuthenticationRequired, ResponseOutcome};
use crate::guard::store::FilterConfig;
use crate::identity::{Identity, IdentityError, IdentityProvider};
use crate::observability::metrics;
use crate::security::SecurityState;

/// The outgoing side of a request, as far as its status is concerned.
///
/// All four status-setting entry points are intercepted identically by
/// [`InterceptedResponse`].
pub trait ResponseChannel {
    fn set_status(&mut self, status: StatusCode);

    fn set_status_with_message(&mut self, status: StatusCode, message: &str);

    /// Set the status and finish the response with an empty error body.
    fn send_error(&mut self, status: StatusCode);

    /// Set the status and finish the response with `message` as its body.
    fn send_error_with_message(&mut self, status: StatusCode, message: &str);

    /// Whether the response can no longer be replaced.
    fn is_committed(&self) -> bool;
}

/// Per-request inputs of the decision. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    identity: Identity,
    security_enforced: bool,
}

impl RequestContext {
    pub fn new(identity: Identity, security_enforced: bool) -> Self {
        Self {
            identity,
            security_enforced,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.identity.is_anonymous()
    }

    pub fn security_enforced(&self) -> bool {
        self.security_enforced
    }
}

/// Wraps a [`ResponseChannel`] for one request and withholds not-found
/// statuses meant for anonymous callers.
///
/// Everything that does not set a status is forwarded untouched. After the
/// first challenge the wrapper reports itself committed and drops any
/// further status-setting calls.
pub struct InterceptedResponse<'a, R: ResponseChannel + ?Sized> {
    inner: &'a mut R,
    context: &'a RequestContext,
    filter: &'a FilterConfig,
    challenge: Option<AuthenticationRequired>,
}

impl<'a, R: ResponseChannel + ?Sized> InterceptedResponse<'a, R> {
    pub fn new(inner: &'a mut R, context: &'a RequestContext, filter: &'a FilterConfig) -> Self {
        Self {
            inner,
            context,
            filter,
            challenge: None,
        }
    }

    pub fn outcome(&self) -> ResponseOutcome {
        match self.challenge {
            Some(signal) => ResponseOutcome::Challenge(signal),
            None => ResponseOutcome::PassThrough,
        }
    }

    /// Returns true when the status may reach the underlying response.
    fn admit(&mut self, status: StatusCode) -> bool {
        if self.challenge.is_some() {
            return false;
        }

        // The flag is read on every attempt, not once per request.
        if should_challenge(
            status,
            self.context.is_anonymous(),
            self.context.security_enforced(),
            self.filter.is_enabled(),
        ) {
            tracing::debug!(%status, "Redirecting to the login page");
            self.challenge = Some(AuthenticationRequired::anonymous_read());
            return false;
        }

        true
    }
}

impl<R: ResponseChannel + ?Sized> ResponseChannel for InterceptedResponse<'_, R> {
    fn set_status(&mut self, status: StatusCode) {
        if self.admit(status) {
            self.inner.set_status(status);
        }
    }

    fn set_status_with_message(&mut self, status: StatusCode, message: &str) {
        if self.admit(status) {
            self.inner.set_status_with_message(status, message);
        }
    }

    fn send_error(&mut self, status: StatusCode) {
        if self.admit(status) {
            self.inner.send_error(status);
        }
    }

    fn send_error_with_message(&mut self, status: StatusCode, message: &str) {
        if self.admit(status) {
            self.inner.send_error_with_message(status, message);
        }
    }

    fn is_committed(&self) -> bool {
        self.challenge.is_some() || self.inner.is_committed()
    }
}

/// Shared by all requests; holds the flag and the two collaborators.
pub struct ResponseInterceptor {
    filter: Arc<FilterConfig>,
    identity: Arc<dyn IdentityProvider>,
    security: Arc<dyn SecurityState>,
}

impl ResponseInterceptor {
    pub fn new(
        filter: Arc<FilterConfig>,
        identity: Arc<dyn IdentityProvider>,
        security: Arc<dyn SecurityState>,
    ) -> Self {
        Self {
            filter,
            identity,
            security,
        }
    }

    pub fn filter(&self) -> &Arc<FilterConfig> {
        &self.filter
    }

    /// Build the context for a request, or `None` when the interceptor must
    /// stay out of the way: filter disabled, security off, or the identity
    /// provider failing. The last case fails open.
    pub fn context_for(&self, headers: &HeaderMap) -> Option<RequestContext> {
        if !self.engaged() {
            return None;
        }
        self.context_with(self.identity.identify(headers).as_ref())
    }

    /// Same as [`context_for`](Self::context_for), for a host that already
    /// resolved the caller for this request.
    pub fn context_from(
        &self,
        identity: Result<&Identity, &IdentityError>,
    ) -> Option<RequestContext> {
        if !self.engaged() {
            return None;
        }
        self.context_with(identity)
    }

    fn engaged(&self) -> bool {
        if !self.filter.is_enabled() {
            metrics::record_passthrough("disabled");
            return false;
        }

        if !self.security.is_enforced() {
            metrics::record_passthrough("security_off");
            return false;
        }

        true
    }

    fn context_with(&self, identity: Result<&Identity, &IdentityError>) -> Option<RequestContext> {
        match identity {
            Ok(identity) => Some(RequestContext::new(identity.clone(), true)),
            Err(e) => {
                tracing::warn!(error = %e, "Identity unavailable, not intercepting");
                metrics::record_passthrough("identity_unavailable");
                None
            }
        }
    }

    /// Run `downstream` against `response`, wrapped when a context is
    /// given, and report what the pipeline has to do.
    pub fn intercept<R, F>(
        &self,
        context: Option<&RequestContext>,
        response: &mut R,
        downstream: F,
    ) -> ResponseOutcome
    where
        R: ResponseChannel,
        F: FnOnce(&mut dyn ResponseChannel),
    {
        let Some(context) = context else {
            downstream(response);
            return ResponseOutcome::PassThrough;
        };

        let mut wrapped = InterceptedResponse::new(response, context, &self.filter);
        downstream(&mut wrapped);

        let outcome = wrapped.outcome();
        match outcome {
            ResponseOutcome::Challenge(_) => metrics::record_challenge(),
            ResponseOutcome::PassThrough => metrics::record_passthrough("not_challenged"),
        }
        outcome
    }
}
