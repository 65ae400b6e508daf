//! Bearer token identities.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::config::UserConfig;
use crate::identity::{Identity, IdentityError, IdentityProvider};

/// Maps `Authorization: Bearer <token>` to a configured user.
///
/// Anything else (no header, another scheme, a malformed value, an unknown
/// token) is anonymous. The user table can
/// be swapped at runtime when the configuration is reloaded.
pub struct TokenIdentityProvider {
    users: ArcSwap<HashMap<String, String>>,
}

impl TokenIdentityProvider {
    pub fn new(users: &[UserConfig]) -> Self {
        Self {
            users: ArcSwap::from_pointee(index_by_token(users)),
        }
    }

    pub fn replace_users(&self, users: &[UserConfig]) {
        self.users.store(Arc::new(index_by_token(users)));
        tracing::info!(users = users.len(), "User table replaced");
    }
}

fn index_by_token(users: &[UserConfig]) -> HashMap<String, String> {
    users
        .iter()
        .map(|u| (u.token.clone(), u.name.clone()))
        .collect()
}

impl IdentityProvider for TokenIdentityProvider {
    fn identify(&self, headers: &HeaderMap) -> Result<Identity, IdentityError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        let Some(token) = token else {
            return Ok(Identity::Anonymous);
        };

        Ok(self
            .users
            .load()
            .get(token)
            .map(|name| Identity::User(name.clone()))
            .unwrap_or(Identity::Anonymous))
    }
}
