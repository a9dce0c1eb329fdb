//! Application environment.
//!
//! Dependencies injected into the reducers. Only the auth reducer uses them;
//! the recipe and shopping-list reducers are pure over their slice.

use crate::providers::{IdentityProvider, SessionStorage};
use recipebook_core::environment::Clock;
use std::sync::Arc;

/// Application environment.
///
/// # Type Parameters
///
/// - `I`: Identity provider
/// - `P`: Session persistence
/// - `C`: Clock
pub struct AppEnvironment<I, P, C>
where
    I: IdentityProvider,
    P: SessionStorage,
    C: Clock,
{
    /// Identity provider.
    pub identity: Arc<I>,

    /// Session persistence.
    pub sessions: Arc<P>,

    /// Clock used to stamp session expiry.
    pub clock: Arc<C>,
}

impl<I, P, C> AppEnvironment<I, P, C>
where
    I: IdentityProvider,
    P: SessionStorage,
    C: Clock,
{
    /// Create a new environment.
    #[must_use]
    pub fn new(identity: I, sessions: P, clock: C) -> Self {
        Self {
            identity: Arc::new(identity),
            sessions: Arc::new(sessions),
            clock: Arc::new(clock),
        }
    }
}

impl<I, P, C> Clone for AppEnvironment<I, P, C>
where
    I: IdentityProvider,
    P: SessionStorage,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            sessions: Arc::clone(&self.sessions),
            clock: Arc::clone(&self.clock),
        }
    }
}
