//! # Recipe Book Runtime
//!
//! Runtime for the recipe book state architecture.
//!
//! This crate provides the [`Store`]: the single owner of application state.
//! It serializes dispatches, runs the reducer on a private copy of the state,
//! publishes the committed snapshot to selector subscribers, and executes the
//! effects the reducer described, feeding their actions back in.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Selection**: Replay-one stream of values projected from the state
//! - **`EffectHandle`**: Lets a caller wait for the effects of one dispatch
//!
//! ## Example
//!
//! ```ignore
//! use recipebook_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Observe a slice of state
//! let mut recipes = store.select(|s: &AppState| Arc::clone(&s.recipes)).await;
//!
//! // Dispatch
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let count = store.state(|s| s.recipes.len()).await;
//! ```

use recipebook_core::effect::{Effect, EffectId};
use recipebook_core::reducer::Reducer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Metric names and registration
pub mod metrics;

/// Selector subscriptions
pub mod selection;

pub use selection::{Selection, Subscription, SubscriptionId};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,

        /// Waiting for effects took longer than allowed
        #[error("Effects still running after {0:?}")]
        EffectsTimedOut(std::time::Duration),
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] so a caller can wait until the effects of
/// that dispatch have finished, including the reduction of any action they
/// fed back. Cancellable effects are long-lived by nature and are not
/// tracked; they end when they complete or are cancelled.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Whether every tracked effect has finished
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.effects.load(Ordering::SeqCst) == 0
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EffectsTimedOut`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::EffectsTimedOut(timeout))
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs even if the effect panics or is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Internal: in-flight cancellable effects, keyed by id
///
/// Each arming gets a generation so a finishing task only removes its own
/// entry, never one that replaced it.
#[derive(Default)]
struct CancellationRegistry {
    next_generation: AtomicU64,
    in_flight: Mutex<HashMap<EffectId, (u64, AbortHandle)>>,
}

impl CancellationRegistry {
    /// Abort whatever runs under `id`, then register the task `spawn` starts
    fn arm(&self, id: EffectId, spawn: impl FnOnce(u64) -> AbortHandle) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, previous)) = in_flight.remove(&id) {
            previous.abort();
            metrics::counter!(metrics::EFFECTS_CANCELLED).increment(1);
            tracing::debug!(effect_id = %id, "Re-armed cancellable effect, previous run aborted");
        }
        in_flight.insert(id, (generation, spawn(generation)));
    }

    fn cancel(&self, id: EffectId) -> bool {
        let removed = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match removed {
            Some((_, handle)) => {
                handle.abort();
                metrics::counter!(metrics::EFFECTS_CANCELLED).increment(1);
                tracing::debug!(effect_id = %id, "Cancelled effect");
                true
            },
            None => {
                tracing::trace!(effect_id = %id, "Nothing in flight to cancel");
                false
            },
        }
    }

    fn finish(&self, id: EffectId, generation: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.get(&id).is_some_and(|(current, _)| *current == generation) {
            in_flight.remove(&id);
        }
    }

    fn contains(&self, id: EffectId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, CancellationRegistry, DecrementGuard, Duration, Effect, EffectHandle, EffectId,
        EffectTracking, Reducer, RwLock, StoreError, metrics,
    };
    use crate::selection::{Selection, SubscriberRegistry, Subscription};
    use futures::future::BoxFuture;
    use std::convert::Infallible;
    use tokio::sync::{broadcast, mpsc};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (an immutable snapshot behind `RwLock`, replaced on every dispatch)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Selector subscribers
    ///
    /// Dispatches are serialized: each one sees the state the previous one
    /// committed, and all subscribers are notified before the next dispatch
    /// starts.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<Arc<S>>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        subscribers: Arc<SubscriberRegistry<S>>,
        cancellations: Arc<CancellationRegistry>,
        /// Every action produced by an effect is broadcast here once it has
        /// been reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast capacity defaults to 16; use
        /// [`Store::with_broadcast_capacity`] for more.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        ///
        /// A slow observer that falls more than `capacity` actions behind
        /// receives `RecvError::Lagged`.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(Arc::new(initial_state))),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                subscribers: Arc::new(SubscriberRegistry::new()),
                cancellations: Arc::new(CancellationRegistry::default()),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// The reducer runs to completion and every subscriber is notified
        /// before this returns. Effects start afterwards; the returned
        /// [`EffectHandle`] tracks them.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut handle = store.send(RecipesAction::Add { recipe }).await;
        /// handle.wait().await;
        /// ```
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> EffectHandle {
            self.send_internal(action, |_: &S| Ok::<(), Infallible>(()))
                .await
                .unwrap_or_else(|never| match never {})
        }

        /// Send an action only if `guard` accepts the current state
        ///
        /// The guard runs under the same lock as the reduction, so no other
        /// dispatch can slip in between the check and the transition.
        ///
        /// # Errors
        ///
        /// Returns the guard's error unchanged; the action is then dropped
        /// and the state is untouched.
        #[tracing::instrument(skip(self, action, guard), name = "store_send_checked")]
        pub async fn send_checked<G, Err>(&self, action: A, guard: G) -> Result<EffectHandle, Err>
        where
            G: FnOnce(&S) -> Result<(), Err> + Send,
            Err: std::fmt::Display,
        {
            self.send_internal(action, guard).await
        }

        /// Send an action and wait for a matching result action
        ///
        /// Designed for request-response flows: subscribes to the action
        /// broadcast before sending, then returns the first action produced by
        /// an effect that matches `predicate`. The matching action has already
        /// been reduced when this returns, so the state reflects it.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before a matching action arrived
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        ///
        /// # Example
        ///
        /// ```ignore
        /// let result = store.send_and_wait_for(
        ///     AuthAction::LoginStart { email, password }.into(),
        ///     |a| matches!(a, AppAction::Auth(AuthAction::LoginSuccess { .. } | AuthAction::LoginFail { .. })),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            let _ = self.send(action).await;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to every action produced by effects
        ///
        /// Actions sent directly through [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> tokio::sync::broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Observe a projection of the state
        ///
        /// The current value is delivered immediately. After that a value is
        /// delivered for each dispatch whose committed state yields an `Arc`
        /// that is not pointer-equal to the last one delivered. Registration
        /// happens under the state lock, so no dispatch is missed and none is
        /// seen twice.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut auth = store.select(|s: &AppState| Arc::clone(&s.auth)).await;
        /// while let Some(auth) = auth.recv().await {
        ///     render(&auth);
        /// }
        /// ```
        pub async fn select<T, F>(&self, selector: F) -> Selection<T>
        where
            T: Send + Sync + 'static,
            F: Fn(&S) -> Arc<T> + Send + 'static,
        {
            let state = self.state.read().await;
            let (tx, rx) = mpsc::unbounded_channel();

            let mut last = selector(&**state);
            let _ = tx.send(Arc::clone(&last));
            metrics::counter!(metrics::SELECTION_EMITTED).increment(1);

            let id = self.subscribers.register(Box::new(move |current: &S| {
                let next = selector(current);
                if Arc::ptr_eq(&last, &next) {
                    return !tx.is_closed();
                }
                last = Arc::clone(&next);
                metrics::counter!(metrics::SELECTION_EMITTED).increment(1);
                tx.send(next).is_ok()
            }));
            drop(state);

            tracing::trace!(subscription = ?id, "Registered selection");
            Selection::new(rx, Subscription::new(id, &self.subscribers))
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.recipes.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&**state)
        }

        /// The current committed snapshot
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.state.read().await)
        }

        /// Number of live selections
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.subscribers.len()
        }

        /// Whether a cancellable effect is currently running under `id`
        #[must_use]
        pub fn is_in_flight(&self, id: EffectId) -> bool {
            self.cancellations.contains(id)
        }

        async fn send_internal<G, Err>(&self, action: A, guard: G) -> Result<EffectHandle, Err>
        where
            G: FnOnce(&S) -> Result<(), Err>,
            Err: std::fmt::Display,
        {
            tracing::debug!(?action, "Processing action");

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                if let Err(error) = guard(&**state) {
                    metrics::counter!(metrics::ACTIONS_REJECTED).increment(1);
                    tracing::debug!(%error, "Action rejected before reduction");
                    return Err(error);
                }
                metrics::counter!(metrics::ACTIONS_TOTAL).increment(1);

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let mut next = S::clone(&**state);
                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut next, action, &self.environment);
                metrics::histogram!(metrics::REDUCER_DURATION)
                    .record(start.elapsed().as_secs_f64());

                *state = Arc::new(next);
                self.subscribers.notify(&state);

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            let (handle, tracking) = EffectHandle::new();
            for effect in effects {
                self.execute_effect_internal(effect, &tracking);
            }
            Ok(handle)
        }

        fn execute_effect_internal(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect_internal(effect, tracking);
                    }
                },
                Effect::Cancellable { id, effect } => self.start_cancellable(id, *effect),
                Effect::Cancel(id) => {
                    self.cancellations.cancel(id);
                },
                effect => {
                    let kind = match &effect {
                        Effect::Future(_) => "future",
                        Effect::Delay { .. } => "delay",
                        _ => "sequential",
                    };
                    tracing::trace!(kind, "Spawning effect");
                    metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => kind).increment(1);

                    tracking.increment();
                    let guard = DecrementGuard(tracking.clone());
                    let run = self.run_inline(effect);
                    tokio::spawn(async move {
                        let _guard = guard;
                        run.await;
                    });
                },
            }
        }

        fn start_cancellable(&self, id: EffectId, effect: Effect<A>) {
            tracing::debug!(effect_id = %id, "Starting cancellable effect");
            metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "cancellable").increment(1);

            let run = self.run_inline(effect);
            let registry = Arc::clone(&self.cancellations);
            self.cancellations.arm(id, move |generation| {
                tokio::spawn(async move {
                    run.await;
                    registry.finish(id, generation);
                })
                .abort_handle()
            });
        }

        /// Run an effect to completion inside the current task
        fn run_inline(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay elapsed after {:?}", duration);
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        futures::future::join_all(effects.into_iter().map(|e| store.run_inline(e)))
                            .await;
                    },
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            store.run_inline(effect).await;
                        }
                    },
                    Effect::Cancellable { id, effect } => store.start_cancellable(id, *effect),
                    Effect::Cancel(id) => {
                        store.cancellations.cancel(id);
                    },
                }
            })
        }

        async fn feed_back(&self, action: A) {
            let _ = self.send(action.clone()).await;
            let _ = self.action_broadcast.send(action);
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                subscribers: Arc::clone(&self.subscribers),
                cancellations: Arc::clone(&self.cancellations),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use recipebook_core::{SmallVec, smallvec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProducePanickingEffect,
        ArmTimer,
        DisarmTimer,
    }

    const TIMER: EffectId = EffectId::new("test-timer");

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceParallelEffects => smallvec![Effect::Parallel(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                ])],
                #[allow(clippy::panic)] // Intentional panic for testing isolation
                TestAction::ProducePanickingEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        panic!("Intentional panic in effect for testing");
                    }))]
                },
                TestAction::ArmTimer => smallvec![
                    Effect::Delay {
                        duration: Duration::from_secs(60),
                        action: Box::new(TestAction::Increment),
                    }
                    .cancellable(TIMER)
                ],
                TestAction::DisarmTimer => smallvec![Effect::Cancel(TIMER)],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, ())
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_none() {
        let store = store();
        let handle = store.send(TestAction::NoOp).await;

        assert!(handle.is_complete());
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await;
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_delay() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_parallel() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await;
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_effect_sequential() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await;
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await;
        handle.wait().await;

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellable_effect_fires_when_not_cancelled() {
        let store = store();

        let handle = store.send(TestAction::ArmTimer).await;
        assert!(handle.is_complete(), "cancellable effects are not tracked");
        assert!(store.is_in_flight(TIMER));

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.state(|s| s.value).await, 1);
        assert!(!store.is_in_flight(TIMER));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_in_flight_effect() {
        let store = store();

        let _ = store.send(TestAction::ArmTimer).await;
        let _ = store.send(TestAction::DisarmTimer).await;
        assert!(!store.is_in_flight(TIMER));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_previous_effect() {
        let store = store();

        let _ = store.send(TestAction::ArmTimer).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        let _ = store.send(TestAction::ArmTimer).await;

        // The first timer would have fired at 60s.
        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        tokio::time::sleep(Duration::from_secs(20)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn cancel_without_in_flight_effect_is_noop() {
        let store = store();
        let _ = store.send(TestAction::DisarmTimer).await;
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn send_checked_rejects_without_reducing() {
        let store = store();

        let result = store
            .send_checked(TestAction::Increment, |s: &TestState| {
                if s.value == 0 { Err("empty") } else { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err("empty")));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_feedback_action() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| matches!(a, TestAction::Increment),
                Duration::from_secs(1),
            )
            .await;

        assert!(matches!(result, Ok(TestAction::Increment)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn send_and_wait_for_returns_after_the_action_is_reduced() {
        let store = store();

        for expected in 1..=200 {
            let result = store
                .send_and_wait_for(
                    TestAction::ProduceEffect,
                    |a| matches!(a, TestAction::Increment),
                    Duration::from_secs(1),
                )
                .await;

            assert!(matches!(result, Ok(TestAction::Increment)));
            assert_eq!(store.state(|s| s.value).await, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn send_and_wait_for_times_out() {
        let store = store();

        let result = store
            .send_and_wait_for(
                TestAction::NoOp,
                |a| matches!(a, TestAction::Increment),
                Duration::from_millis(50),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn completed_handle_does_not_wait() {
        let mut handle = EffectHandle::completed();
        assert!(handle.wait_with_timeout(Duration::from_millis(10)).await.is_ok());
    }
}
