use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag shared between a [`crate::TreeEngine`] and its worker.
///
/// At most one toggle is in flight at a time. A request arriving while the
/// flag is set is dropped rather than queued.
#[derive(Debug, Clone, Default)]
pub struct ToggleGuard {
    busy: Arc<AtomicBool>,
}

impl ToggleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a toggle as in flight, or return `None` when one already is.
    pub fn try_acquire(&self) -> Option<BusyTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyTicket {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of an in-flight toggle. Dropping it clears the busy flag.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the ticket is dropped"]
pub struct BusyTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
