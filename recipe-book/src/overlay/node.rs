//! Alert nodes and the mount point they are placed into.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// A single UI mount point.
///
/// Holds at most one node. The overlay always clears before mounting.
pub trait OverlaySlot: Send + Sync + 'static {
    /// Remove whatever is mounted. Clearing an empty slot is a no-op.
    fn clear(&self);

    /// Mount `alert`.
    fn mount(&self, alert: AlertNode);
}

/// Close control handed to the UI with each alert.
///
/// Only the first [`CloseSignal::fire`] reaches the overlay; clones share
/// that state.
#[derive(Debug, Clone)]
pub struct CloseSignal {
    tx: mpsc::UnboundedSender<()>,
    fired: Arc<AtomicBool>,
}

impl CloseSignal {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signal = Self {
            tx,
            fired: Arc::new(AtomicBool::new(false)),
        };
        (signal, rx)
    }

    /// Request the alert be closed.
    ///
    /// Returns `true` the first time it is called, `false` afterwards.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // The overlay may already have torn this alert down.
        let _ = self.tx.send(());
        true
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// An alert to display.
#[derive(Debug, Clone)]
pub struct AlertNode {
    /// Monotonic id, unique per overlay
    pub id: u64,
    /// Text to show
    pub message: String,
    /// Fire to dismiss
    pub close: CloseSignal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_fire_is_delivered() {
        let (signal, mut rx) = CloseSignal::new();
        let clone = signal.clone();

        assert!(signal.fire());
        assert!(!clone.fire());
        assert!(clone.is_fired());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn firing_after_the_receiver_is_gone_is_harmless() {
        let (signal, rx) = CloseSignal::new();
        drop(rx);
        assert!(signal.fire());
    }
}
