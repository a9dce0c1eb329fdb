//! Auth facade over the application store.

use super::actions::AuthAction;
use super::state::AuthState;
use crate::providers::{AuthMode, IdentityProvider, SessionStorage};
use crate::{AppAction, AppStore, selectors};
use recipebook_core::environment::Clock;
use recipebook_runtime::{EffectHandle, Selection, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Entry point for authentication.
///
/// Starting an attempt returns as soon as the state shows it pending; the
/// outcome arrives later through [`AuthService::changes`]. Use
/// [`AuthService::authenticate`] to wait for it instead.
pub struct AuthService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    store: AppStore<I, P, C>,
}

impl<I, P, C> AuthService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: AppStore<I, P, C>) -> Self {
        Self { store }
    }

    /// Start a login attempt.
    pub async fn login(&self, identity: impl Into<String>, secret: impl Into<String>) -> EffectHandle {
        self.dispatch(AuthAction::start(AuthMode::Login, identity, secret)).await
    }

    /// Start a signup attempt.
    pub async fn signup(&self, identity: impl Into<String>, secret: impl Into<String>) -> EffectHandle {
        self.dispatch(AuthAction::start(AuthMode::Signup, identity, secret)).await
    }

    /// Run an attempt and wait for the action that resolves it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: The provider did not answer within `timeout`
    /// - [`StoreError::ChannelClosed`]: The store's action channel closed
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        identity: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<AuthAction, StoreError> {
        let resolved = self
            .store
            .send_and_wait_for(
                AuthAction::start(mode, identity, secret).into(),
                |action| matches!(action, AppAction::Auth(auth) if auth.is_resolution()),
                timeout,
            )
            .await?;

        match resolved {
            AppAction::Auth(action) => Ok(action),
            // The predicate only accepts auth actions.
            AppAction::Recipes(_) | AppAction::ShoppingList(_) => Err(StoreError::ChannelClosed),
        }
    }

    /// Sign out and cancel the expiry timer.
    pub async fn logout(&self) -> EffectHandle {
        self.dispatch(AuthAction::Logout).await
    }

    /// Sign in from persistence if a still-valid session is stored.
    pub async fn restore_session(&self) -> EffectHandle {
        self.dispatch(AuthAction::RestoreSession).await
    }

    /// Dismiss the current error.
    pub async fn clear_error(&self) -> EffectHandle {
        self.dispatch(AuthAction::ClearError).await
    }

    /// The current auth slice.
    pub async fn state(&self) -> Arc<AuthState> {
        self.store.state(selectors::auth).await
    }

    /// The auth slice now and after every change.
    pub async fn changes(&self) -> Selection<AuthState> {
        self.store.select(selectors::auth).await
    }

    async fn dispatch(&self, action: AuthAction) -> EffectHandle {
        self.store.send(action.into()).await
    }
}

impl<I, P, C> Clone for AuthService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
