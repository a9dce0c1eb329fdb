//! Mock identity provider.

use crate::providers::{AuthMode, AuthReply, IdentityProvider, ProviderErrorCode};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Minimum secret length accepted on signup
const MIN_SECRET_LEN: usize = 6;

type Outcome = Result<AuthReply, ProviderErrorCode>;

/// A recorded `authenticate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Flow requested
    pub mode: AuthMode,
    /// Identity submitted
    pub identity: String,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<String, String>,
    scripted: VecDeque<(Duration, Outcome)>,
    calls: Vec<Call>,
}

/// Mock identity provider.
///
/// Behaves like a small account directory: login checks the registered
/// secret, signup registers new accounts. Scripted responses, when queued,
/// are returned first in order and may be delayed to simulate latency.
#[derive(Debug, Clone)]
pub struct MockIdentityProvider {
    inner: Arc<Mutex<Inner>>,
    issued: Arc<AtomicU64>,
    lifetime_secs: u64,
    latency: Duration,
}

impl MockIdentityProvider {
    /// Create an empty directory issuing one-hour tokens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            issued: Arc::new(AtomicU64::new(0)),
            lifetime_secs: 3600,
            latency: Duration::ZERO,
        }
    }

    /// Register an account.
    #[must_use]
    pub fn with_account(self, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        self.lock().accounts.insert(identity.into(), secret.into());
        self
    }

    /// Set the lifetime of issued tokens.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime_secs: u64) -> Self {
        self.lifetime_secs = lifetime_secs;
        self
    }

    /// Delay every directory-backed response.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a response to return on the next call, ahead of the directory.
    pub fn push_response(&self, outcome: Outcome) {
        self.push_delayed_response(Duration::ZERO, outcome);
    }

    /// Queue a response that resolves after `delay`.
    pub fn push_delayed_response(&self, delay: Duration, outcome: Outcome) {
        self.lock().scripted.push_back((delay, outcome));
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reply(&self, identity: &str) -> AuthReply {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        AuthReply {
            token: format!("mock-token-{n}"),
            identity: identity.to_string(),
            lifetime_secs: self.lifetime_secs,
        }
    }

    fn resolve(&self, mode: AuthMode, identity: &str, secret: &str) -> (Duration, Outcome) {
        let mut inner = self.lock();
        inner.calls.push(Call {
            mode,
            identity: identity.to_string(),
        });
        if let Some(scripted) = inner.scripted.pop_front() {
            return scripted;
        }

        let outcome = match mode {
            AuthMode::Login => match inner.accounts.get(identity) {
                None => Err(ProviderErrorCode::EmailNotFound),
                Some(expected) if expected != secret => Err(ProviderErrorCode::InvalidCredentials),
                Some(_) => Ok(()),
            },
            AuthMode::Signup => {
                if inner.accounts.contains_key(identity) {
                    Err(ProviderErrorCode::AccountExists)
                } else if secret.chars().count() < MIN_SECRET_LEN {
                    Err(ProviderErrorCode::WeakSecret)
                } else {
                    inner.accounts.insert(identity.to_string(), secret.to_string());
                    Ok(())
                }
            },
        };
        drop(inner);

        (self.latency, outcome.map(|()| self.reply(identity)))
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn authenticate(
        &self,
        mode: AuthMode,
        identity: &str,
        secret: &str,
    ) -> impl Future<Output = Result<AuthReply, ProviderErrorCode>> + Send {
        let (delay, outcome) = self.resolve(mode, identity, secret);

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }
}
