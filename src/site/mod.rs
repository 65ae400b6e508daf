//! Host site protected by the guard.
//!
//! A minimal application with the behavior the guard cares about: a login
//! entry point, projects guarded by per-project read ACLs, and 404 for
//! anything a caller cannot see. Unreadable projects answer 404 rather
//! than 403 so their existence is not disclosed.

pub mod login;
pub mod projects;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::identity::Identity;
use crate::security::SecurityState;

pub use projects::ProjectAcl;

/// State shared by site handlers.
#[derive(Clone)]
pub struct SiteState {
    pub projects: Arc<ProjectAcl>,
    pub security: Arc<dyn SecurityState>,
}

impl SiteState {
    /// `None` when the project does not exist. Every existing project is
    /// readable while permissions are not enforced.
    pub fn can_read(&self, project: &str, identity: &Identity) -> Option<bool> {
        let readable = self.projects.can_read(project, identity)?;
        Some(readable || !self.security.is_enforced())
    }

    /// Projects listed on the index for `identity`.
    pub fn visible_projects(&self, identity: &Identity) -> Vec<String> {
        if self.security.is_enforced() {
            self.projects.readable_by(identity)
        } else {
            self.projects.names()
        }
    }
}

/// Build the site routes. The login page is mounted at `login_path`.
pub fn setup_site_router(state: SiteState, login_path: &str) -> Router {
    Router::new()
        .route("/", get(projects::index))
        .route("/job/{name}", get(projects::show_project))
        .route(login_path, get(login::login_page))
        .fallback(projects::not_found)
        .with_state(state)
}
