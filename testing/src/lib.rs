//! # Recipe Book Testing
//!
//! Testing utilities and helpers for the recipe book state architecture.
//!
//! This crate provides:
//! - Deterministic clocks
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effect descriptions
//! - Async helpers for waiting on store-driven side effects
//!
//! ## Example
//!
//! ```ignore
//! use recipebook_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(AuthReducer::new())
//!     .with_env(test_environment(test_clock()))
//!     .given_state(AuthState::default())
//!     .when_action(AuthAction::Logout)
//!     .then_state(|s| assert!(s.user.is_none()))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use recipebook_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use recipebook_testing::mocks::FixedClock;
    /// use recipebook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the environment.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Epoch used by every test clock (2025-01-01 00:00:00 UTC)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use std::future::Future;
    use std::time::Duration;

    /// Poll `condition` until it holds or `timeout` elapses
    ///
    /// Returns whether the condition was met. Useful when the thing under
    /// test reacts on its own task.
    pub async fn eventually<F, Fut>(timeout: Duration, mut condition: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let poll = async {
            loop {
                if condition().await {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }

    /// Install a fmt subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`. Calling it more than once is harmless.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::eventually;
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(mocks::test_epoch());
        let shared = clock.clone();

        clock.advance(chrono::Duration::seconds(90));

        assert_eq!(shared.now(), mocks::test_epoch() + chrono::Duration::seconds(90));
    }

    #[tokio::test]
    async fn eventually_reports_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let met = eventually(Duration::from_secs(1), || {
            let calls = Arc::clone(&calls);
            async move { calls.fetch_add(1, Ordering::SeqCst) >= 2 }
        })
        .await;

        assert!(met);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn eventually_gives_up_after_timeout() {
        let met = eventually(Duration::from_millis(20), || async { false }).await;
        assert!(!met);
    }
}
