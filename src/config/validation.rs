//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values. Every problem is
//! reported, not just the first one.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GuardConfig, PLACEHOLDER_API_KEY};
use crate::identity::ANONYMOUS;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("security.login_path must start with '/' and not clash with site routes: {0}")]
    InvalidLoginPath(String),

    #[error("security.users contains an entry with an empty name or token")]
    EmptyUser,

    #[error("user name {0} is reserved for unauthenticated callers")]
    ReservedUserName(String),

    #[error("duplicate user name: {0}")]
    DuplicateUser(String),

    #[error("token of user {0} is shared with another user")]
    DuplicateToken(String),

    #[error("duplicate project name: {0}")]
    DuplicateProject(String),

    #[error("admin.api_key must be changed when the admin API is enabled")]
    PlaceholderApiKey,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !is_usable_login_path(&config.security.login_path) {
        errors.push(ValidationError::InvalidLoginPath(
            config.security.login_path.clone(),
        ));
    }

    let mut names = HashSet::new();
    let mut tokens = HashSet::new();
    for user in &config.security.users {
        if user.name.is_empty() || user.token.is_empty() {
            errors.push(ValidationError::EmptyUser);
            continue;
        }
        if user.name == ANONYMOUS {
            errors.push(ValidationError::ReservedUserName(user.name.clone()));
        }
        if !names.insert(user.name.as_str()) {
            errors.push(ValidationError::DuplicateUser(user.name.clone()));
        }
        if !tokens.insert(user.token.as_str()) {
            errors.push(ValidationError::DuplicateToken(user.name.clone()));
        }
    }

    let mut projects = HashSet::new();
    for project in &config.site.projects {
        if !projects.insert(project.name.as_str()) {
            errors.push(ValidationError::DuplicateProject(project.name.clone()));
        }
    }

    if config.admin.enabled && config.admin.api_key == PLACEHOLDER_API_KEY {
        errors.push(ValidationError::PlaceholderApiKey);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_usable_login_path(path: &str) -> bool {
    path.starts_with('/')
        && path != "/"
        && !path.starts_with("/job/")
        && !path.starts_with("/admin/")
        && !path.contains(['{', '}', '?', '#'])
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
