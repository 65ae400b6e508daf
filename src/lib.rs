//! Anonymous 404 guard.
//!
//! Anonymous callers that hit a "not found" response are sent to the login
//! page instead, so they cannot probe which resources exist. Authenticated
//! callers keep their 404.

pub mod admin;
pub mod config;
pub mod guard;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod site;

pub use config::GuardConfig;
pub use guard::{FilterConfig, ResponseInterceptor, ResponseOutcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
