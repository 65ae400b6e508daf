//! Projects and their read ACLs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension,
};

use crate::config::SiteConfig;
use crate::identity::Identity;
use crate::site::login::escape_html;
use crate::site::SiteState;

#[derive(Debug, Default)]
struct AclTable {
    administrators: HashSet<String>,
    readers: HashMap<String, HashSet<String>>,
}

impl AclTable {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            administrators: config.administrators.iter().cloned().collect(),
            readers: config
                .projects
                .iter()
                .map(|p| (p.name.clone(), p.readers.iter().cloned().collect()))
                .collect(),
        }
    }
}

/// Read permissions per project, swappable on config reload.
pub struct ProjectAcl {
    table: ArcSwap<AclTable>,
}

impl ProjectAcl {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            table: ArcSwap::from_pointee(AclTable::from_config(config)),
        }
    }

    pub fn replace(&self, config: &SiteConfig) {
        self.table.store(Arc::new(AclTable::from_config(config)));
        tracing::info!(projects = config.projects.len(), "Project ACLs replaced");
    }

    /// `None` when the project does not exist.
    pub fn can_read(&self, project: &str, identity: &Identity) -> Option<bool> {
        let table = self.table.load();
        let readers = table.readers.get(project)?;
        Some(table.administrators.contains(identity.name()) || readers.contains(identity.name()))
    }

    /// Names of the projects `identity` may read, sorted.
    pub fn readable_by(&self, identity: &Identity) -> Vec<String> {
        let table = self.table.load();
        let is_admin = table.administrators.contains(identity.name());
        let mut names: Vec<String> = table
            .readers
            .iter()
            .filter(|(_, readers)| is_admin || readers.contains(identity.name()))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Every project name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.load().readers.keys().cloned().collect();
        names.sort();
        names
    }
}

pub async fn index(
    State(state): State<SiteState>,
    Extension(identity): Extension<Identity>,
) -> Html<String> {
    let items: String = state
        .visible_projects(&identity)
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!("<li><a href=\"/job/{name}\">{name}</a></li>")
        })
        .collect();

    Html(format!(
        "<!DOCTYPE html><html><head><title>Projects</title></head>\
         <body><p>Signed in as {}</p><ul>{items}</ul></body></html>",
        escape_html(identity.name())
    ))
}

pub async fn show_project(
    State(state): State<SiteState>,
    Extension(identity): Extension<Identity>,
    Path(name): Path<String>,
) -> Response {
    match state.can_read(&name, &identity) {
        Some(true) => Html(format!(
            "<!DOCTYPE html><html><head><title>{0}</title></head>\
             <body><h1>Project {0}</h1></body></html>",
            escape_html(&name)
        ))
        .into_response(),
        _ => {
            tracing::debug!(project = %name, user = %identity.name(), "Project hidden from caller");
            not_found().await.into_response()
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    fn acl() -> ProjectAcl {
        ProjectAcl::new(&SiteConfig {
            administrators: vec!["admin".into()],
            projects: vec![
                ProjectConfig {
                    name: "test1".into(),
                    readers: vec!["user1".into(), "anonymous".into()],
                },
                ProjectConfig {
                    name: "test2".into(),
                    readers: vec![],
                },
            ],
        })
    }

    #[test]
    fn test_read_matrix() {
        let acl = acl();
        let admin = Identity::User("admin".into());
        let user1 = Identity::User("user1".into());

        assert_eq!(acl.can_read("test1", &Identity::Anonymous), Some(true));
        assert_eq!(acl.can_read("test2", &Identity::Anonymous), Some(false));
        assert_eq!(acl.can_read("test1", &user1), Some(true));
        assert_eq!(acl.can_read("test2", &user1), Some(false));
        assert_eq!(acl.can_read("test2", &admin), Some(true));
        assert_eq!(acl.can_read("missing", &admin), None);
    }

    #[test]
    fn test_readable_by() {
        let acl = acl();
        assert_eq!(acl.readable_by(&Identity::Anonymous), vec!["test1"]);
        assert_eq!(acl.readable_by(&Identity::User("admin".into())), vec!["test1", "test2"]);
    }

    #[test]
    fn test_replace() {
        let acl = acl();
        acl.replace(&SiteConfig::default());
        assert_eq!(acl.can_read("test1", &Identity::Anonymous), None);
    }
}
