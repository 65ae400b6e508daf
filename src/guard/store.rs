//! Persisted enablement flag.
//!
//! The live value is an atomic so every request observes the latest write
//! without locking. Writes go through to a small TOML state file so the
//! flag survives restarts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::metrics;

/// Error type for reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize filter state: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    enabled: bool,
}

/// Process-wide enablement flag for the not-found filter.
#[derive(Debug)]
pub struct FilterConfig {
    enabled: AtomicBool,
    state_path: Option<PathBuf>,
}

impl FilterConfig {
    /// A flag that is never persisted.
    pub fn in_memory(enabled: bool) -> Self {
        metrics::record_enabled(enabled);
        Self {
            enabled: AtomicBool::new(enabled),
            state_path: None,
        }
    }

    /// Load the flag from `path`, falling back to `default_enabled` when the
    /// file does not exist yet.
    pub fn load(path: impl Into<PathBuf>, default_enabled: bool) -> Result<Self, StoreError> {
        let path = path.into();

        let enabled = match fs::read_to_string(&path) {
            Ok(content) => {
                let state: PersistedState =
                    toml::from_str(&content).map_err(|source| StoreError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                state.enabled
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => default_enabled,
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::info!(path = ?path, enabled, "Filter state loaded");
        metrics::record_enabled(enabled);

        Ok(Self {
            enabled: AtomicBool::new(enabled),
            state_path: Some(path),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Update the flag and persist it.
    ///
    /// The new value takes effect immediately, even when persisting fails;
    /// the error is returned so the caller can report it.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        let previous = self.enabled.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            tracing::info!(enabled, "Not-found filter toggled");
        }
        metrics::record_enabled(enabled);

        match &self.state_path {
            Some(path) => persist(path, enabled),
            None => Ok(()),
        }
    }

    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }
}

/// Write via a sibling temp file and rename, so a crash never leaves a
/// truncated state file behind.
fn persist(path: &Path, enabled: bool) -> Result<(), StoreError> {
    let content = toml::to_string(&PersistedState { enabled })?;
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    tracing::debug!(path = ?path, enabled, "Filter state persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_state_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");

        assert!(!FilterConfig::load(&path, false).unwrap().is_enabled());
        assert!(FilterConfig::load(&path, true).unwrap().is_enabled());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_enabled_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let config = FilterConfig::load(&path, false).unwrap();
        config.set_enabled(true).unwrap();
        assert!(config.is_enabled());

        // The persisted value wins over the configured default.
        let reloaded = FilterConfig::load(&path, false).unwrap();
        assert!(reloaded.is_enabled());

        reloaded.set_enabled(false).unwrap();
        assert!(!FilterConfig::load(&path, true).unwrap().is_enabled());
    }

    #[test]
    fn test_repeated_writes_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");

        let config = FilterConfig::load(&path, false).unwrap();
        config.set_enabled(true).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        config.set_enabled(true).unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert!(config.is_enabled());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_corrupt_state_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "enabled = \"maybe\"").unwrap();

        let err = FilterConfig::load(&path, false).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_in_memory_flag() {
        let config = FilterConfig::in_memory(false);
        config.set_enabled(true).unwrap();
        assert!(config.is_enabled());
        assert!(config.state_path().is_none());
    }
}
