//! Administrative API for the not-found filter.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::guard::FilterConfig;
use crate::security::SecurityState;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub filter: Arc<FilterConfig>,
    pub security: Arc<dyn SecurityState>,
    pub api_key: Arc<str>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/redirect404", get(get_filter).put(put_filter))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
