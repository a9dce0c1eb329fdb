//! Error types for the recipe book domain.
//!
//! None of these ever reach shared state: they are returned synchronously to
//! the caller of a service method. Authentication failures are different and
//! live in `AuthState::auth_error`.

use thiserror::Error;

/// A recipe index did not address an existing recipe.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// Index is at or past the end of the collection.
    #[error("recipe index {index} is out of range (collection has {len} recipes)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Collection length at the time of the check
        len: usize,
    },
}

impl IndexError {
    /// Check `index` against a collection of `len` entries.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] when `index >= len`.
    pub const fn check(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::OutOfRange { index, len })
        }
    }
}

/// An ingredient was rejected before reaching the shopping list.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidIngredient {
    /// Amount is zero, negative, NaN or infinite.
    #[error("ingredient `{name}` has amount {amount}; amounts must be finite and greater than zero")]
    Amount {
        /// Ingredient name
        name: String,
        /// Rejected amount
        amount: f64,
    },
}

/// Failure talking to session or recipe persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("storage backend failed: {0}")]
    Backend(String),
}
