//! Busy Flags
//!
//! Single-flight gating for the reply fetch, the exchange as a whole and
//! document generation. A flag is claimed with [`BusyFlag::try_acquire`] and
//! released when the returned guard drops, on every exit path including
//! task abort.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared boolean gate ("busy flag")
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    /// Create an idle flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag, or `None` if it is already held
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether the flag is currently held
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds a [`BusyFlag`] until dropped
#[derive(Debug)]
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
