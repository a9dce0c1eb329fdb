//! Transient alert overlay.
//!
//! Watches the auth slice and mounts a single dismissible alert into an
//! [`OverlaySlot`] whenever a new authentication error appears.

pub mod injector;
pub mod node;

pub use injector::{ALERTS_MOUNTED, AlertOverlay, OverlayHandle, register_metrics};
pub use node::{AlertNode, CloseSignal, OverlaySlot};
