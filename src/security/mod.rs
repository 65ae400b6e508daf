//! Security subsystem state.
//!
//! Answers one question for the guard: is the application enforcing
//! permissions right now? When it is not, there is nothing to hide and the
//! guard stays inert.

pub mod enforcement;

pub use enforcement::ConfiguredSecurity;

/// Whether the host application currently checks permissions.
///
/// Called on the request path; implementations must not block.
pub trait SecurityState: Send + Sync {
    fn is_enforced(&self) -> bool;
}
