//! In-memory session and recipe persistence.

use crate::auth::UserSession;
use crate::error::StorageError;
use crate::providers::{RecipeRecord, RecipeStorage, SessionStorage};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory session persistence.
///
/// Can be told to fail writes, to exercise the log-only failure path.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    session: Arc<Mutex<Option<UserSession>>>,
    fail_writes: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
    clears: Arc<AtomicUsize>,
}

impl InMemorySessionStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `session`.
    #[must_use]
    pub fn with_session(session: UserSession) -> Self {
        let storage = Self::new();
        *storage.slot() = Some(session);
        storage
    }

    /// Make `save` and `clear` fail from now on.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The currently persisted session.
    #[must_use]
    pub fn stored(&self) -> Option<UserSession> {
        self.slot().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of successful clears.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<UserSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> impl Future<Output = Result<Option<UserSession>, StorageError>> + Send {
        let session = self.stored();
        async move { Ok(session) }
    }

    fn save(
        &self,
        session: &UserSession,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        let result = self.check_writable().map(|()| {
            *self.slot() = Some(session.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
        });
        async move { result }
    }

    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send {
        let result = self.check_writable().map(|()| {
            *self.slot() = None;
            self.clears.fetch_add(1, Ordering::SeqCst);
        });
        async move { result }
    }
}

/// In-memory recipe persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipeStorage {
    records: Arc<Mutex<Vec<RecipeRecord>>>,
}

impl InMemoryRecipeStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    #[must_use]
    pub fn with_records(records: Vec<RecipeRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Everything stored so far.
    #[must_use]
    pub fn stored(&self) -> Vec<RecipeRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl RecipeStorage for InMemoryRecipeStorage {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<RecipeRecord>, StorageError>> + Send {
        let records = self.stored();
        async move { Ok(records) }
    }

    fn save_all(
        &self,
        recipes: Vec<RecipeRecord>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = recipes;
        async { Ok(()) }
    }
}
