//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server applies security, users and project ACLs
//! ```
//!
//! The enablement flag is not part of the reloadable state: after first
//! start it lives in its own state file and is changed through the admin API.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, FilterSettings, GuardConfig, ListenerConfig, ObservabilityConfig,
    ProjectConfig, SecurityConfig, SiteConfig, TimeoutConfig, UserConfig,
};
