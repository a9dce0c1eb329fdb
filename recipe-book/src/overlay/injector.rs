//! The task that drives alerts from the auth slice.

use super::node::{AlertNode, CloseSignal, OverlaySlot};
use crate::auth::{AuthAction, AuthState};
use crate::providers::{IdentityProvider, SessionStorage};
use crate::{AppState, AppStore, selectors};
use metrics::{counter, describe_counter};
use recipebook_core::environment::Clock;
use recipebook_runtime::{Selection, Subscription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Alerts mounted into the overlay slot
pub const ALERTS_MOUNTED: &str = "overlay.alerts.mounted";

/// Describe the overlay's metrics.
pub fn register_metrics() {
    describe_counter!(ALERTS_MOUNTED, "Total number of authentication alerts mounted");
}

enum Event {
    Auth(Option<Arc<AuthState>>),
    Closed,
}

/// Mounts an alert for each new authentication error.
///
/// An alert is mounted when `auth_error` changes to a message different
/// from the previous value, tearing down any alert still showing. Closing
/// the alert clears the slot and dispatches [`AuthAction::ClearError`],
/// unless a newer error has replaced the one the alert was showing.
pub struct AlertOverlay<I, P, C, S>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
    S: OverlaySlot,
{
    store: AppStore<I, P, C>,
    slot: Arc<S>,
    next_id: u64,
    last_error: Option<String>,
    mounted: Option<String>,
}

impl<I, P, C, S> AlertOverlay<I, P, C, S>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
    S: OverlaySlot,
{
    /// Start the overlay on its own task.
    ///
    /// The auth selection is registered before this returns, so no error
    /// dispatched afterwards is missed. An error already present in the
    /// store is shown immediately.
    pub async fn spawn(store: AppStore<I, P, C>, slot: Arc<S>) -> OverlayHandle {
        let auth = store.select(selectors::auth).await;
        let subscription = auth.subscription();
        let overlay = Self {
            store,
            slot,
            next_id: 0,
            last_error: None,
            mounted: None,
        };

        OverlayHandle {
            subscription,
            task: Some(tokio::spawn(overlay.run(auth))),
        }
    }

    async fn run(mut self, mut auth: Selection<AuthState>) {
        tracing::debug!("Alert overlay started");
        let mut close: Option<mpsc::UnboundedReceiver<()>> = None;

        loop {
            let event = tokio::select! {
                next = auth.recv() => Event::Auth(next),
                () = closed(&mut close) => Event::Closed,
            };

            match event {
                Event::Auth(Some(state)) => self.observe(&state, &mut close),
                Event::Auth(None) => break,
                Event::Closed => {
                    close = None;
                    self.slot.clear();
                    tracing::debug!("Alert closed");
                    if let Some(message) = self.mounted.take() {
                        self.dismiss(message).await;
                    }
                },
            }
        }

        if close.take().is_some() {
            self.slot.clear();
        }
        tracing::debug!("Alert overlay stopped");
    }

    fn observe(&mut self, auth: &AuthState, close: &mut Option<mpsc::UnboundedReceiver<()>>) {
        let fresh = auth
            .auth_error
            .as_deref()
            .filter(|message| self.last_error.as_deref() != Some(*message));
        if let Some(message) = fresh {
            *close = None;
            self.slot.clear();

            let (signal, rx) = CloseSignal::new();
            self.next_id += 1;
            tracing::info!(alert = self.next_id, %message, "Mounting authentication alert");
            self.slot.mount(AlertNode {
                id: self.next_id,
                message: message.to_string(),
                close: signal,
            });
            self.mounted = Some(message.to_string());
            *close = Some(rx);
            counter!(ALERTS_MOUNTED).increment(1);
        }
        self.last_error.clone_from(&auth.auth_error);
    }

    /// Clear the error a closed alert was showing, leaving a newer one alone.
    async fn dismiss(&self, message: String) {
        let outcome = self
            .store
            .send_checked(AuthAction::ClearError.into(), move |state: &AppState| {
                if state.auth.auth_error.as_deref() == Some(message.as_str()) {
                    Ok(())
                } else {
                    Err("error already replaced")
                }
            })
            .await;
        if let Err(reason) = outcome {
            tracing::debug!(reason, "Closed alert left the current error in place");
        }
    }
}

/// Resolves when the current alert's close signal fires; never resolves
/// while no alert is mounted.
async fn closed(close: &mut Option<mpsc::UnboundedReceiver<()>>) {
    if let Some(rx) = close {
        if rx.recv().await.is_some() {
            return;
        }
    }
    std::future::pending::<()>().await;
}

/// Handle to a running [`AlertOverlay`].
///
/// Dropping the handle stops the overlay without waiting for it.
#[derive(Debug)]
pub struct OverlayHandle {
    subscription: Subscription,
    task: Option<JoinHandle<()>>,
}

impl OverlayHandle {
    /// Stop the overlay and wait for its task to finish.
    ///
    /// A mounted alert is cleared on the way out.
    pub async fn shutdown(mut self) {
        self.subscription.unsubscribe();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::warn!(%error, "Alert overlay task failed");
            }
        }
    }

    /// Whether the overlay task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
