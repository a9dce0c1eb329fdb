//! Session persistence backed by a JSON file.

use crate::auth::UserSession;
use crate::error::StorageError;
use crate::providers::SessionStorage;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Keeps the session blob as pretty-printed JSON at a fixed path.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write never leaves a truncated blob.
#[derive(Debug, Clone)]
pub struct JsonFileSessionStorage {
    path: PathBuf,
}

impl JsonFileSessionStorage {
    /// Store the session at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(path: PathBuf) -> Result<Option<UserSession>, StorageError> {
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn write(path: PathBuf, session: UserSession) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(&session)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let temp = path.with_extension("tmp");
        fs::write(&temp, json).await?;
        fs::rename(&temp, &path).await?;

        tracing::debug!(path = %path.display(), "Session written");
        Ok(())
    }

    async fn remove(path: PathBuf) -> Result<(), StorageError> {
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

impl SessionStorage for JsonFileSessionStorage {
    fn load(&self) -> impl Future<Output = Result<Option<UserSession>, StorageError>> + Send {
        Self::read(self.path.clone())
    }

    fn save(
        &self,
        session: &UserSession,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        Self::write(self.path.clone(), session.clone())
    }

    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send {
        Self::remove(self.path.clone())
    }
}
