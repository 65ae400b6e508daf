//! Request pipeline middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::guard::{ResponseChannel, ResponseInterceptor, ResponseOutcome};
use crate::http::challenge::LoginChallenge;
use crate::http::response::PendingResponse;
use crate::identity::{Identity, IdentityError, IdentityProvider};

/// The single identity lookup made for a request by [`resolve_identity`].
#[derive(Debug, Clone)]
pub struct ResolvedIdentity(pub Result<Identity, IdentityError>);

/// State for [`not_found_guard`].
#[derive(Clone)]
pub struct GuardState {
    pub interceptor: Arc<ResponseInterceptor>,
    pub challenge: LoginChallenge,
}

/// Replaces anonymous 404 responses with a redirect to the login page.
///
/// When the interceptor is inert for the request the downstream response
/// is returned as is, without being wrapped. The identity found by
/// [`resolve_identity`] is reused; without that layer the interceptor asks
/// its own provider.
pub async fn not_found_guard(
    State(state): State<GuardState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // A missing login page must not redirect to itself.
    if request.uri().path() == state.challenge.login_path() {
        return next.run(request).await;
    }

    let context = match request.extensions().get::<ResolvedIdentity>() {
        Some(ResolvedIdentity(resolved)) => state.interceptor.context_from(resolved.as_ref()),
        None => state.interceptor.context_for(request.headers()),
    };
    let Some(context) = context else {
        return next.run(request).await;
    };

    let from = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut pending = PendingResponse::new(next.run(request).await);
    let status = pending.status();

    let outcome = state
        .interceptor
        .intercept(Some(&context), &mut pending, |channel| channel.set_status(status));

    match outcome {
        ResponseOutcome::PassThrough => pending.into_response(),
        ResponseOutcome::Challenge(signal) => {
            tracing::debug!(path = %from, %signal, "Challenging anonymous not-found");
            state.challenge.respond(signal, &from, pending.is_committed())
        }
    }
}

/// Resolves the caller once and attaches the result to the request: the
/// [`ResolvedIdentity`] for the guard, and the [`Identity`] for site
/// handlers. Site handlers see anonymous when the provider fails.
pub async fn resolve_identity(
    State(provider): State<Arc<dyn IdentityProvider>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let resolved = provider.identify(request.headers());
    let identity = match &resolved {
        Ok(identity) => identity.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "Identity provider failed, treating caller as anonymous");
            Identity::Anonymous
        }
    };

    request.extensions_mut().insert(ResolvedIdentity(resolved));
    request.extensions_mut().insert(identity);
    next.run(request).await
}
