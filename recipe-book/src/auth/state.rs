//! Authentication state.

use crate::providers::{AuthMode, AuthReply};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An authenticated session.
///
/// Serializes to the blob kept by session persistence.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Authenticated identity (normally an email address)
    pub identity: String,
    /// Credential token
    pub token: String,
    /// Instant after which the token is no longer valid
    pub token_expires_at: DateTime<Utc>,
}

impl UserSession {
    /// Build a session from a provider reply received at `now`.
    #[must_use]
    pub fn from_reply(reply: AuthReply, now: DateTime<Utc>) -> Self {
        let expires_at = i64::try_from(reply.lifetime_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            identity: reply.identity,
            token: reply.token,
            token_expires_at: expires_at,
        }
    }

    /// Whether the token is still valid at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at > now
    }

    /// The token, if still valid at `now`.
    #[must_use]
    pub fn token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        self.is_valid_at(now).then_some(self.token.as_str())
    }

    /// Lifetime left at `now`; zero once expired.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.token_expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Debug for UserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSession")
            .field("identity", &self.identity)
            .field("token_expires_at", &self.token_expires_at)
            .finish_non_exhaustive()
    }
}

/// Authentication slice of the application state.
///
/// `loading` and `auth_error` are never set together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Present iff authenticated
    pub user: Option<UserSession>,
    /// An authentication round trip is in flight
    pub loading: bool,
    /// Message for the error alert, if one should be visible
    pub auth_error: Option<String>,
    /// Flow of the in-flight attempt; `Some` exactly while `loading`
    pub attempt: Option<AuthMode>,
}

/// Named view of [`AuthState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase<'a> {
    /// Signed out, nothing pending, no error
    Anonymous,
    /// A login or signup is in flight
    Pending(AuthMode),
    /// Signed in
    Authenticated(&'a UserSession),
    /// Signed out after a failed attempt
    Failed(&'a str),
}

impl AuthState {
    /// Derive the current phase.
    #[must_use]
    pub fn phase(&self) -> AuthPhase<'_> {
        if let Some(mode) = self.attempt.filter(|_| self.loading) {
            return AuthPhase::Pending(mode);
        }
        if let Some(session) = &self.user {
            return AuthPhase::Authenticated(session);
        }
        match &self.auth_error {
            Some(message) => AuthPhase::Failed(message),
            None => AuthPhase::Anonymous,
        }
    }

    /// Whether a session is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// `loading` and `auth_error` are never both set.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !(self.loading && self.auth_error.is_some())
    }
}
