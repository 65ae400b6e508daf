//! Turns an [`AuthenticationRequired`] outcome into a login challenge.

use std::sync::Arc;

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::guard::AuthenticationRequired;

/// Redirects challenged requests to the login entry point.
#[derive(Debug, Clone)]
pub struct LoginChallenge {
    login_path: Arc<str>,
}

impl LoginChallenge {
    pub fn new(login_path: &str) -> Self {
        Self {
            login_path: Arc::from(login_path),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Login URL that returns the caller to `from` afterwards.
    pub fn login_url(&self, from: &str) -> String {
        let from: String = form_urlencoded::byte_serialize(from.as_bytes()).collect();
        format!("{}?from={}", self.login_path, from)
    }

    /// `303 See Other` to the login page, or `401` when the response was
    /// already committed and can no longer be redirected.
    pub fn respond(&self, signal: AuthenticationRequired, from: &str, committed: bool) -> Response {
        if committed {
            return (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, "Bearer realm=\"redirect404\"")],
                signal.to_string(),
            )
                .into_response();
        }

        Redirect::to(&self.login_url(from)).into_response()
    }
}
