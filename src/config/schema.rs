//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard
//! and the host site it protects. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Not-found filter settings.
    pub filter: FilterSettings,

    /// Security subsystem settings (enforcement, users, login entry point).
    pub security: SecurityConfig,

    /// Resources served by the host site.
    pub site: SiteConfig,

    /// Administrative API.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Settings for the not-found filter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Initial value of the enablement flag. Only used when no state file
    /// exists yet; afterwards the persisted value wins.
    pub enabled: bool,

    /// File holding the persisted enablement flag.
    pub state_path: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            state_path: "redirect404.toml".to_string(),
        }
    }
}

/// Security subsystem configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Whether permissions are enforced at all.
    pub enabled: bool,

    /// Path of the login entry point challenges redirect to.
    pub login_path: String,

    /// Known users and their bearer tokens.
    pub users: Vec<UserConfig>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            login_path: "/login".to_string(),
            users: Vec::new(),
        }
    }
}

/// A user that can authenticate with a bearer token.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    pub token: String,
}

/// Host site configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Users that may read every project.
    pub administrators: Vec<String>,

    /// Projects served under `/job/{name}`.
    pub projects: Vec<ProjectConfig>,
}

/// A project and the users allowed to read it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,

    /// User names with read access. `"anonymous"` grants anonymous read.
    #[serde(default)]
    pub readers: Vec<String>,
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Placeholder key rejected by validation when the admin API is enabled.
pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
