//! Authentication actions.

use super::state::UserSession;
use crate::providers::AuthMode;

/// Everything that can happen to the auth slice.
///
/// `*Start` actions come from the UI; `*Success`/`*Fail` are produced by the
/// effect pipeline. `RestoreSession` asks the pipeline to look for a
/// persisted session and never changes state by itself.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Begin a login round trip
    LoginStart {
        /// Identity (email)
        identity: String,
        /// Secret (password)
        secret: String,
    },
    /// Login round trip succeeded
    LoginSuccess {
        /// New session
        session: UserSession,
    },
    /// Login round trip failed
    LoginFail {
        /// User-facing message
        message: String,
    },
    /// Begin a signup round trip
    SignupStart {
        /// Identity (email)
        identity: String,
        /// Secret (password)
        secret: String,
    },
    /// Signup round trip succeeded
    SignupSuccess {
        /// New session
        session: UserSession,
    },
    /// Signup round trip failed
    SignupFail {
        /// User-facing message
        message: String,
    },
    /// User signed out
    Logout,
    /// Dismiss the current error
    ClearError,
    /// A persisted session was found still valid
    AutoLogin {
        /// Restored session
        session: UserSession,
    },
    /// The session's token expired
    AutoLogout,
    /// Look for a persisted session (dispatched once at start-up)
    RestoreSession,
}

impl AuthAction {
    /// The start action for `mode`.
    #[must_use]
    pub fn start(mode: AuthMode, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        let (identity, secret) = (identity.into(), secret.into());
        match mode {
            AuthMode::Login => Self::LoginStart { identity, secret },
            AuthMode::Signup => Self::SignupStart { identity, secret },
        }
    }

    /// The success action for `mode`.
    #[must_use]
    pub fn success(mode: AuthMode, session: UserSession) -> Self {
        match mode {
            AuthMode::Login => Self::LoginSuccess { session },
            AuthMode::Signup => Self::SignupSuccess { session },
        }
    }

    /// The failure action for `mode`.
    #[must_use]
    pub fn fail(mode: AuthMode, message: String) -> Self {
        match mode {
            AuthMode::Login => Self::LoginFail { message },
            AuthMode::Signup => Self::SignupFail { message },
        }
    }

    /// Whether this action resolves a login or signup attempt.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::LoginSuccess { .. }
                | Self::LoginFail { .. }
                | Self::SignupSuccess { .. }
                | Self::SignupFail { .. }
        )
    }
}

// Secrets never reach logs.
impl std::fmt::Debug for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginStart { identity, .. } => f
                .debug_struct("LoginStart")
                .field("identity", identity)
                .finish_non_exhaustive(),
            Self::SignupStart { identity, .. } => f
                .debug_struct("SignupStart")
                .field("identity", identity)
                .finish_non_exhaustive(),
            Self::LoginSuccess { session } => {
                f.debug_struct("LoginSuccess").field("session", session).finish()
            },
            Self::SignupSuccess { session } => {
                f.debug_struct("SignupSuccess").field("session", session).finish()
            },
            Self::AutoLogin { session } => {
                f.debug_struct("AutoLogin").field("session", session).finish()
            },
            Self::LoginFail { message } => {
                f.debug_struct("LoginFail").field("message", message).finish()
            },
            Self::SignupFail { message } => {
                f.debug_struct("SignupFail").field("message", message).finish()
            },
            Self::Logout => f.write_str("Logout"),
            Self::ClearError => f.write_str("ClearError"),
            Self::AutoLogout => f.write_str("AutoLogout"),
            Self::RestoreSession => f.write_str("RestoreSession"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_secret() {
        let action = AuthAction::start(AuthMode::Login, "cook@example.com", "hunter22");
        let rendered = format!("{action:?}");
        assert!(rendered.contains("cook@example.com"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn constructors_pick_the_mode_variant() {
        assert!(matches!(
            AuthAction::start(AuthMode::Signup, "a", "b"),
            AuthAction::SignupStart { .. }
        ));
        assert!(matches!(
            AuthAction::fail(AuthMode::Login, "x".into()),
            AuthAction::LoginFail { .. }
        ));
    }
}
