//! Single-flight fetch latch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-view "fetch in flight" flag.
///
/// Clones share the flag, so the task that performs the fetch can clear the
/// latch of the view that scheduled it.
#[derive(Debug, Clone, Default)]
pub struct FetchLatch {
    in_flight: Arc<AtomicBool>,
}

impl FetchLatch {
    /// Create a cleared latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch if it is clear. Returns `true` when this call set it.
    pub fn try_acquire(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Clear the latch.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while a fetch is scheduled or running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}
