//! HTTP pipeline.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, tracing, timeout)
//!     → middleware.rs resolve_identity (Identity into extensions)
//!     → middleware.rs not_found_guard (wrap when engaged)
//!     → site / admin handlers
//!     → not_found_guard replays the status through the interceptor
//!     → challenge.rs (redirect to login) or original response
//! ```

pub mod challenge;
pub mod middleware;
pub mod response;
pub mod server;

pub use challenge::LoginChallenge;
pub use middleware::{not_found_guard, resolve_identity, GuardState, ResolvedIdentity};
pub use response::{PendingResponse, StatusMessage};
pub use server::HttpServer;
