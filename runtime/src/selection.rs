//! Selector subscriptions over store state.
//!
//! A [`Selection`] is an ordered stream of values projected out of the
//! store's state. It replays the current value on registration and after
//! that only delivers values whose identity changed: a selector that
//! returns the same `Arc` as last time produces no emission.

use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Identifier of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A listener is told about every committed state; it returns `false`
/// once its subscriber is gone so the registry can prune it.
pub(crate) type Listener<S> = Box<dyn FnMut(&S) -> bool + Send>;

/// Registry of selector listeners for one store
pub(crate) struct SubscriberRegistry<S> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
}

impl<S> SubscriberRegistry<S> {
    pub(crate) const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, listener: Listener<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    /// Run every listener against the newly committed state, in
    /// registration order.
    pub(crate) fn notify(&self, state: &S) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain_mut(|(_, listener)| listener(state));
        let pruned = before - listeners.len();
        if pruned > 0 {
            tracing::trace!(pruned, "Pruned listeners whose subscribers were dropped");
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Type-erased removal so [`Subscription`] does not carry the state type
trait Unregister: Send + Sync {
    fn unregister(&self, id: SubscriptionId) -> bool;
}

impl<S: Send> Unregister for SubscriberRegistry<S> {
    fn unregister(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

/// Handle that cancels a selection
///
/// Cloneable, so the party that decides to stop listening need not own
/// the stream itself. Unsubscribing twice is a no-op.
#[derive(Clone)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<dyn Unregister>,
}

impl Subscription {
    pub(crate) fn new<S: Send + 'static>(
        id: SubscriptionId,
        registry: &Arc<SubscriberRegistry<S>>,
    ) -> Self {
        let registry: Arc<dyn Unregister> = Arc::clone(registry) as Arc<dyn Unregister>;
        Self {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// Stop delivery to this selection
    ///
    /// Returns `true` if the listener was still registered.
    pub fn unsubscribe(&self) -> bool {
        let removed = self
            .registry
            .upgrade()
            .is_some_and(|registry| registry.unregister(self.id));
        if removed {
            tracing::trace!(subscription = ?self.id, "Unsubscribed");
        }
        removed
    }

    /// This subscription's identifier
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Ordered stream of selected values
///
/// Values arrive in dispatch order. The stream ends once the selection is
/// unsubscribed and every already-delivered value has been read.
/// Dropping the selection unsubscribes it.
pub struct Selection<T> {
    receiver: mpsc::UnboundedReceiver<Arc<T>>,
    subscription: Subscription,
}

impl<T> Selection<T> {
    pub(crate) const fn new(
        receiver: mpsc::UnboundedReceiver<Arc<T>>,
        subscription: Subscription,
    ) -> Self {
        Self {
            receiver,
            subscription,
        }
    }

    /// Wait for the next value
    ///
    /// Returns `None` once the selection has been unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<Arc<T>> {
        self.receiver.recv().await
    }

    /// Take the next value if one has already been delivered
    pub fn try_recv(&mut self) -> Option<Arc<T>> {
        self.receiver.try_recv().ok()
    }

    /// Drain every value delivered so far
    pub fn drain(&mut self) -> Vec<Arc<T>> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// A handle that can cancel this selection from elsewhere
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        self.subscription.clone()
    }

    /// Stop delivery; values already delivered can still be read
    pub fn unsubscribe(&self) -> bool {
        self.subscription.unsubscribe()
    }
}

impl<T> Stream for Selection<T> {
    type Item = Arc<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl<T> Drop for Selection<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl<T> std::fmt::Debug for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_listener(tx: mpsc::UnboundedSender<u32>) -> Listener<u32> {
        Box::new(move |state: &u32| tx.send(*state).is_ok())
    }

    #[test]
    fn notify_runs_listeners_in_registration_order() {
        let registry = SubscriberRegistry::<u32>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            registry.register(Box::new(move |_| {
                order.lock().unwrap_or_else(PoisonError::into_inner).push(tag);
                true
            }));
        }

        registry.notify(&1);

        let order = order.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(*order, vec!["first", "second"]);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let registry = SubscriberRegistry::<u32>::new();
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(counting_listener(tx));
        assert_eq!(registry.len(), 1);

        drop(rx);
        registry.notify(&7);

        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let registry = Arc::new(SubscriberRegistry::<u32>::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(counting_listener(tx));
        let subscription = Subscription::new(id, &registry);

        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unsubscribe_after_registry_dropped_is_noop() {
        let registry = Arc::new(SubscriberRegistry::<u32>::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(counting_listener(tx));
        let subscription = Subscription::new(id, &registry);
        drop(registry);

        assert!(!subscription.unsubscribe());
    }
}
