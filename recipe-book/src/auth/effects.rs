//! Side effects of the auth lifecycle.
//!
//! Each function returns an effect *description*; the store runs it. None of
//! them touch state: results come back as [`AuthAction`]s.

use super::actions::AuthAction;
use super::messages::message_for;
use super::state::UserSession;
use crate::providers::{AuthMode, IdentityProvider, SessionStorage};
use recipebook_core::effect::{Effect, EffectId};
use recipebook_core::environment::Clock;
use recipebook_core::{async_effect, cancellable, delay};
use std::sync::Arc;
use std::time::Duration;

/// Cancellation key of the session expiry timer.
pub const EXPIRY_TIMER: EffectId = EffectId::new("auth.expiry-timer");

/// Identity-provider round trip, resolving to `*Success` or `*Fail`.
pub fn authenticate<I, C>(
    provider: Arc<I>,
    clock: Arc<C>,
    mode: AuthMode,
    identity: String,
    secret: String,
) -> Effect<AuthAction>
where
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    async_effect! {
        match provider.authenticate(mode, &identity, &secret).await {
            Ok(reply) => {
                let session = UserSession::from_reply(reply, clock.now());
                tracing::info!(%mode, identity = %session.identity, "Authentication succeeded");
                Some(AuthAction::success(mode, session))
            },
            Err(code) => {
                tracing::info!(%mode, %identity, error = %code, "Authentication failed");
                Some(AuthAction::fail(mode, message_for(&code).to_string()))
            },
        }
    }
}

/// One-shot timer dispatching `AutoLogout` after `remaining`.
///
/// Arming replaces any timer already running.
#[must_use]
pub fn arm_expiry_timer(remaining: Duration) -> Effect<AuthAction> {
    tracing::debug!(?remaining, "Arming session expiry timer");
    cancellable! {
        id: EXPIRY_TIMER,
        effect: delay! {
            duration: remaining,
            action: AuthAction::AutoLogout
        }
    }
}

/// Stop the expiry timer, if armed.
#[must_use]
pub const fn cancel_expiry_timer() -> Effect<AuthAction> {
    Effect::Cancel(EXPIRY_TIMER)
}

/// Write the session to persistence. Failures are logged only.
pub fn persist_session<P>(storage: Arc<P>, session: UserSession) -> Effect<AuthAction>
where
    P: SessionStorage + 'static,
{
    async_effect! {
        match storage.save(&session).await {
            Ok(()) => tracing::debug!(identity = %session.identity, "Persisted session"),
            Err(error) => tracing::warn!(%error, "Failed to persist session"),
        }
        None
    }
}

/// Remove the persisted session. Failures are logged only.
pub fn forget_session<P>(storage: Arc<P>) -> Effect<AuthAction>
where
    P: SessionStorage + 'static,
{
    async_effect! {
        match storage.clear().await {
            Ok(()) => tracing::debug!("Cleared persisted session"),
            Err(error) => tracing::warn!(%error, "Failed to clear persisted session"),
        }
        None
    }
}

/// Look for a persisted session and resolve to `AutoLogin` if it is still
/// valid; otherwise resolve to nothing.
pub fn restore_session<P, C>(storage: Arc<P>, clock: Arc<C>) -> Effect<AuthAction>
where
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    async_effect! {
        match storage.load().await {
            Ok(Some(session)) if session.is_valid_at(clock.now()) => {
                tracing::info!(identity = %session.identity, "Restoring persisted session");
                Some(AuthAction::AutoLogin { session })
            },
            Ok(Some(session)) => {
                tracing::debug!(expired_at = %session.token_expires_at, "Persisted session has expired");
                None
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "Failed to read persisted session");
                None
            },
        }
    }
}
