use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub filter_enabled: bool,
    pub security_enforced: bool,
}

/// Body of `GET` and `PUT /admin/redirect404`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterToggle {
    pub enabled: bool,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        filter_enabled: state.filter.is_enabled(),
        security_enforced: state.security.is_enforced(),
    })
}

pub async fn get_filter(State(state): State<AdminState>) -> Json<FilterToggle> {
    Json(FilterToggle {
        enabled: state.filter.is_enabled(),
    })
}

pub async fn put_filter(
    State(state): State<AdminState>,
    Json(toggle): Json<FilterToggle>,
) -> Result<Json<FilterToggle>, (StatusCode, Json<ErrorBody>)> {
    state.filter.set_enabled(toggle.enabled).map_err(|e| {
        tracing::error!(error = %e, "Failed to persist filter state");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(toggle))
}
