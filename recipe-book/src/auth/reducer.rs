//! Auth state machine.
//!
//! # Transitions
//!
//! | Action                      | user    | loading | auth_error |
//! |-----------------------------|---------|---------|------------|
//! | `LoginStart`/`SignupStart`  | kept    | true    | cleared    |
//! | `*Success`/`AutoLogin`      | session | false   | cleared    |
//! | `*Fail`                     | cleared | false   | message    |
//! | `Logout`/`AutoLogout`       | cleared | false   | cleared    |
//! | `ClearError`                | kept    | kept    | cleared    |
//!
//! A second start while one is pending restarts the attempt; the first
//! round trip is not cancelled and whichever response arrives last wins.

use super::actions::AuthAction;
use super::effects;
use super::state::{AuthState, UserSession};
use crate::environment::AppEnvironment;
use crate::providers::{AuthMode, IdentityProvider, SessionStorage};
use recipebook_core::effect::Effect;
use recipebook_core::environment::Clock;
use recipebook_core::reducer::Reducer;
use recipebook_core::{SmallVec, smallvec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Auth reducer.
///
/// Operates on the shared `Arc<AuthState>` slice and only replaces it when
/// a transition actually changes something, so subscribers to the slice
/// are not woken by no-ops.
pub struct AuthReducer<I, P, C> {
    _phantom: PhantomData<fn() -> (I, P, C)>,
}

impl<I, P, C> AuthReducer<I, P, C> {
    /// Create a new auth reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<I, P, C> Default for AuthReducer<I, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, C> AuthReducer<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    fn start(
        state: &mut Arc<AuthState>,
        mode: AuthMode,
        identity: String,
        secret: String,
        env: &AppEnvironment<I, P, C>,
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        if state.loading {
            tracing::debug!(%mode, "Restarting pending attempt; the earlier response may still land");
        }
        update(state, |auth| {
            auth.loading = true;
            auth.attempt = Some(mode);
            auth.auth_error = None;
        });

        smallvec![effects::authenticate(
            Arc::clone(&env.identity),
            Arc::clone(&env.clock),
            mode,
            identity,
            secret,
        )]
    }

    fn sign_in(state: &mut Arc<AuthState>, session: UserSession) {
        update(state, |auth| {
            auth.user = Some(session);
            auth.loading = false;
            auth.attempt = None;
            auth.auth_error = None;
        });
    }

    fn sign_out(state: &mut Arc<AuthState>) {
        update(state, |auth| *auth = AuthState::default());
    }
}

/// Apply `change` and swap in the result only if it differs.
fn update(state: &mut Arc<AuthState>, change: impl FnOnce(&mut AuthState)) {
    let mut next = AuthState::clone(&**state);
    change(&mut next);
    if next != **state {
        *state = Arc::new(next);
    }
}

impl<I, P, C> Reducer for AuthReducer<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    type State = Arc<AuthState>;
    type Action = AuthAction;
    type Environment = AppEnvironment<I, P, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::LoginStart { identity, secret } => {
                Self::start(state, AuthMode::Login, identity, secret, env)
            },
            AuthAction::SignupStart { identity, secret } => {
                Self::start(state, AuthMode::Signup, identity, secret, env)
            },

            AuthAction::LoginSuccess { session } | AuthAction::SignupSuccess { session } => {
                let remaining = session.remaining_at(env.clock.now());
                tracing::info!(identity = %session.identity, "Signed in");
                Self::sign_in(state, session.clone());
                smallvec![
                    effects::persist_session(Arc::clone(&env.sessions), session),
                    effects::arm_expiry_timer(remaining),
                ]
            },

            AuthAction::AutoLogin { session } => {
                let remaining = session.remaining_at(env.clock.now());
                tracing::info!(identity = %session.identity, "Signed in from persisted session");
                Self::sign_in(state, session);
                smallvec![effects::arm_expiry_timer(remaining)]
            },

            AuthAction::LoginFail { message } | AuthAction::SignupFail { message } => {
                tracing::info!(%message, "Authentication attempt failed");
                update(state, |auth| {
                    auth.user = None;
                    auth.loading = false;
                    auth.attempt = None;
                    auth.auth_error = Some(message);
                });
                smallvec![Effect::None]
            },

            AuthAction::Logout => {
                tracing::info!("Signed out");
                Self::sign_out(state);
                smallvec![
                    effects::cancel_expiry_timer(),
                    effects::forget_session(Arc::clone(&env.sessions)),
                ]
            },

            AuthAction::AutoLogout => {
                tracing::info!("Session expired, signing out");
                Self::sign_out(state);
                smallvec![effects::forget_session(Arc::clone(&env.sessions))]
            },

            AuthAction::ClearError => {
                update(state, |auth| auth.auth_error = None);
                smallvec![Effect::None]
            },

            AuthAction::RestoreSession => smallvec![effects::restore_session(
                Arc::clone(&env.sessions),
                Arc::clone(&env.clock),
            )],
        }
    }
}
