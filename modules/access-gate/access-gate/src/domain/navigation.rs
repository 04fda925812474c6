//! Navigation tracking.
//!
//! Each navigation gets an epoch. Only the evaluation holding the latest
//! epoch may commit side effects; anything older resolved too late.

use std::sync::atomic::{AtomicU64, Ordering};

/// One navigation into the gate. Consumed by a single evaluation.
#[derive(Debug, PartialEq, Eq)]
pub struct Navigation {
    epoch: u64,
    target: String,
}

impl Navigation {
    /// The requested location, including any query string.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Hands out navigation epochs and answers whether one is still current.
#[derive(Debug, Default)]
pub struct NavigationTracker {
    epoch: AtomicU64,
}

impl NavigationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation, superseding every earlier one.
    #[must_use]
    pub fn begin(&self, target: impl Into<String>) -> Navigation {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        Navigation {
            epoch,
            target: target.into(),
        }
    }

    #[must_use]
    pub fn is_current(&self, nav: &Navigation) -> bool {
        self.epoch.load(Ordering::Acquire) == nav.epoch
    }
}
