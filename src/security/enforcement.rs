//! Enforcement switch seeded from configuration.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::security::SecurityState;

/// Global enforcement flag, updated when the configuration is reloaded.
#[derive(Debug)]
pub struct ConfiguredSecurity {
    enforced: AtomicBool,
}

impl ConfiguredSecurity {
    pub fn new(enforced: bool) -> Self {
        Self {
            enforced: AtomicBool::new(enforced),
        }
    }

    pub fn set_enforced(&self, enforced: bool) {
        if self.enforced.swap(enforced, Ordering::AcqRel) != enforced {
            tracing::info!(enforced, "Security enforcement changed");
        }
    }
}

impl SecurityState for ConfiguredSecurity {
    fn is_enforced(&self) -> bool {
        self.enforced.load(Ordering::Acquire)
    }
}
