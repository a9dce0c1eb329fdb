//! Recording overlay slot.

use crate::overlay::{AlertNode, CloseSignal, OverlaySlot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Overlay slot that records what was mounted.
#[derive(Debug, Default)]
pub struct InMemorySlot {
    mounted: Mutex<Option<AlertNode>>,
    mounts: AtomicUsize,
    clears: AtomicUsize,
}

impl InMemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mounted alert, if any.
    #[must_use]
    pub fn current(&self) -> Option<AlertNode> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Message of the mounted alert, if any.
    #[must_use]
    pub fn current_message(&self) -> Option<String> {
        self.current().map(|alert| alert.message)
    }

    /// Close control of the mounted alert, if any.
    #[must_use]
    pub fn close_signal(&self) -> Option<CloseSignal> {
        self.current().map(|alert| alert.close)
    }

    /// Fire the mounted alert's close signal, as a user would.
    ///
    /// Returns `false` if nothing is mounted or the alert was already closed.
    pub fn close_current(&self) -> bool {
        self.close_signal().is_some_and(|close| close.fire())
    }

    /// Whether nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// Number of mounts so far.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.mounts.load(Ordering::SeqCst)
    }

    /// Number of clears so far.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl OverlaySlot for InMemorySlot {
    fn clear(&self) {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner).take();
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn mount(&self, alert: AlertNode) {
        let mut mounted = self.mounted.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = mounted.replace(alert) {
            tracing::warn!(alert = previous.id, "Mounted over an alert that was never cleared");
        }
        self.mounts.fetch_add(1, Ordering::SeqCst);
    }
}
