//! Integration tests for selector subscriptions and action broadcasting

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use futures::StreamExt;
use proptest::prelude::*;
use recipebook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use recipebook_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_pending, assert_ready};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, Default)]
struct TwoSlices {
    left: Arc<Vec<u32>>,
    right: Arc<Vec<u32>>,
}

#[derive(Debug, Clone)]
enum SliceAction {
    PushLeft(u32),
    PushRight(u32),
    Touch,
    PushLeftLater(u32),
}

struct SliceReducer;

impl Reducer for SliceReducer {
    type State = TwoSlices;
    type Action = SliceAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut TwoSlices,
        action: SliceAction,
        _env: &(),
    ) -> SmallVec<[Effect<SliceAction>; 4]> {
        match action {
            SliceAction::PushLeft(v) => Arc::make_mut(&mut state.left).push(v),
            SliceAction::PushRight(v) => Arc::make_mut(&mut state.right).push(v),
            SliceAction::Touch => {},
            SliceAction::PushLeftLater(v) => {
                return smallvec![Effect::Future(Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Some(SliceAction::PushLeft(v))
                }))];
            },
        }
        smallvec![Effect::None]
    }
}

type SliceStore = Store<TwoSlices, SliceAction, (), SliceReducer>;

fn store() -> SliceStore {
    Store::new(TwoSlices::default(), SliceReducer, ())
}

// ============================================================================
// Selections
// ============================================================================

#[tokio::test]
async fn replays_current_value_on_registration() {
    let store = store();
    let _ = store.send(SliceAction::PushLeft(1)).await;

    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;

    assert_eq!(*left.try_recv().unwrap(), vec![1]);
    assert!(left.try_recv().is_none());
}

#[tokio::test]
async fn each_mutation_emits_exactly_once() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    left.drain();

    let _ = store.send(SliceAction::PushLeft(1)).await;
    let _ = store.send(SliceAction::PushLeft(2)).await;

    let values: Vec<Vec<u32>> = left.drain().iter().map(|v| v.to_vec()).collect();
    assert_eq!(values, vec![vec![1], vec![1, 2]]);
}

#[tokio::test]
async fn untouched_slice_does_not_emit() {
    let store = store();
    let mut right = store.select(|s: &TwoSlices| Arc::clone(&s.right)).await;
    right.drain();

    let _ = store.send(SliceAction::PushLeft(1)).await;
    let _ = store.send(SliceAction::Touch).await;

    assert!(right.try_recv().is_none());
}

#[tokio::test]
async fn snapshots_already_delivered_are_never_mutated() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    let initial = left.try_recv().unwrap();

    let _ = store.send(SliceAction::PushLeft(9)).await;

    assert!(initial.is_empty());
    assert_eq!(*left.try_recv().unwrap(), vec![9]);
}

#[tokio::test]
async fn unsubscribe_stops_delivery_and_is_idempotent() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    let subscription = left.subscription();
    left.drain();

    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());
    assert!(!left.unsubscribe());

    let _ = store.send(SliceAction::PushLeft(1)).await;

    assert!(left.next().await.is_none(), "stream ends after unsubscribe");
    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test]
async fn dropping_a_selection_unregisters_it() {
    let store = store();
    let left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    assert_eq!(store.subscriber_count(), 1);

    drop(left);

    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test]
async fn stream_is_pending_until_next_dispatch() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    left.drain();

    let mut next = tokio_test::task::spawn(left.next());
    assert_pending!(next.poll());

    let _ = store.send(SliceAction::PushLeft(4)).await;

    assert!(next.is_woken());
    let value = assert_ready!(next.poll()).unwrap();
    assert_eq!(*value, vec![4]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_are_delivered_in_commit_order() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    left.drain();

    let mut tasks = Vec::new();
    for v in 0..50 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let _ = store.send(SliceAction::PushLeft(v)).await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let values = left.drain();
    assert_eq!(values.len(), 50);
    for (i, snapshot) in values.iter().enumerate() {
        assert_eq!(snapshot.len(), i + 1, "each delivery extends the previous one");
    }
    assert_eq!(values.last().unwrap().as_ref(), &*store.snapshot().await.left);
}

#[tokio::test]
async fn late_subscriber_sees_only_current_value() {
    let store = store();
    for v in 0..3 {
        let _ = store.send(SliceAction::PushLeft(v)).await;
    }

    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;

    assert_eq!(left.drain().len(), 1);
}

// ============================================================================
// Action broadcasting
// ============================================================================

#[tokio::test]
async fn effect_actions_are_broadcast_but_direct_sends_are_not() {
    let store = store();
    let mut actions = store.subscribe_actions();

    let _ = store.send(SliceAction::PushRight(1)).await;
    let mut handle = store.send(SliceAction::PushLeftLater(2)).await;
    handle.wait().await;

    let observed = actions.try_recv().unwrap();
    assert!(matches!(observed, SliceAction::PushLeft(2)));
    assert!(actions.try_recv().is_err());
}

#[tokio::test]
async fn feedback_reduction_is_visible_to_selections() {
    let store = store();
    let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
    left.drain();

    let mut handle = store.send(SliceAction::PushLeftLater(7)).await;
    handle.wait().await;

    assert_eq!(*left.try_recv().unwrap(), vec![7]);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_slice_action() -> impl Strategy<Value = SliceAction> {
    prop_oneof![
        (0u32..1000).prop_map(SliceAction::PushLeft),
        (0u32..1000).prop_map(SliceAction::PushRight),
        Just(SliceAction::Touch),
    ]
}

proptest! {
    #[test]
    fn selections_see_every_change_to_their_slice_in_dispatch_order(
        actions in prop::collection::vec(arb_slice_action(), 0..40),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let store = store();
            let mut left = store.select(|s: &TwoSlices| Arc::clone(&s.left)).await;
            let mut right = store.select(|s: &TwoSlices| Arc::clone(&s.right)).await;

            let mut expected_left = vec![Vec::new()];
            let mut expected_right = vec![Vec::new()];
            for action in actions {
                match &action {
                    SliceAction::PushLeft(v) => {
                        let mut next = expected_left.last().cloned().unwrap_or_default();
                        next.push(*v);
                        expected_left.push(next);
                    },
                    SliceAction::PushRight(v) => {
                        let mut next = expected_right.last().cloned().unwrap_or_default();
                        next.push(*v);
                        expected_right.push(next);
                    },
                    _ => {},
                }
                let _ = store.send(action).await;
            }

            let seen_left: Vec<Vec<u32>> = left.drain().iter().map(|v| v.to_vec()).collect();
            let seen_right: Vec<Vec<u32>> = right.drain().iter().map(|v| v.to_vec()).collect();
            assert_eq!(seen_left, expected_left);
            assert_eq!(seen_right, expected_right);
        });
    }
}
