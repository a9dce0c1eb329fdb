//! Contracts for the external collaborators the state core talks to.
//!
//! The core never implements these against a real network or database.
//! In-memory versions live in [`crate::mocks`]; a JSON file session store
//! lives in [`crate::storage`].

use crate::auth::UserSession;
use crate::error::StorageError;
use crate::model::{Ingredient, Recipe};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Which identity-provider flow to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMode {
    /// Sign in to an existing account
    Login,
    /// Create a new account
    Signup,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Signup => f.write_str("signup"),
        }
    }
}

/// Successful identity-provider response.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthReply {
    /// Credential token
    pub token: String,
    /// Identity the provider authenticated (normally the email)
    pub identity: String,
    /// Token lifetime granted by the provider, in seconds
    pub lifetime_secs: u64,
}

impl std::fmt::Debug for AuthReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthReply")
            .field("identity", &self.identity)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

/// Failure codes an identity provider may return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    /// Wrong secret for an existing identity
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with this identity
    #[error("identity not found")]
    EmailNotFound,

    /// Signup for an identity that already has an account
    #[error("account already exists")]
    AccountExists,

    /// Secret rejected as too weak
    #[error("secret too weak")]
    WeakSecret,

    /// Provider could not be reached
    #[error("provider unreachable")]
    Unreachable,

    /// Anything else, with the provider's raw code
    #[error("unknown provider error: {0}")]
    Unknown(String),
}

impl ProviderErrorCode {
    /// Map a raw wire code to a known variant.
    ///
    /// Recognises the codes returned by hosted identity services
    /// (`EMAIL_EXISTS`, `EMAIL_NOT_FOUND`, `INVALID_PASSWORD`, ...). Matching
    /// ignores a trailing ` : detail` suffix.
    #[must_use]
    pub fn from_code(raw: &str) -> Self {
        let code = raw.split(" : ").next().unwrap_or(raw).trim();
        match code {
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "EMAIL_EXISTS" => Self::AccountExists,
            "WEAK_PASSWORD" => Self::WeakSecret,
            "NETWORK_REQUEST_FAILED" => Self::Unreachable,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Identity provider.
///
/// This trait abstracts over the remote authentication service.
pub trait IdentityProvider: Send + Sync {
    /// Run a login or signup round trip.
    ///
    /// # Errors
    ///
    /// Returns the provider's failure code; the effect pipeline turns it
    /// into a user-facing message.
    fn authenticate(
        &self,
        mode: AuthMode,
        identity: &str,
        secret: &str,
    ) -> impl Future<Output = Result<AuthReply, ProviderErrorCode>> + Send;
}

/// Session persistence.
///
/// Holds at most one serialized session.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the blob is malformed.
    fn load(&self) -> impl Future<Output = Result<Option<UserSession>, StorageError>> + Send;

    /// Replace the persisted session.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn save(&self, session: &UserSession)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove the persisted session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// A recipe as the remote store returns it.
///
/// Remote records may omit the ingredient list entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Image URI
    pub image_path: String,
    /// Ingredients, absent for records saved without any
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
}

impl RecipeRecord {
    /// Convert into a [`Recipe`], treating a missing ingredient list as empty.
    #[must_use]
    pub fn into_recipe(self) -> Recipe {
        Recipe {
            name: self.name,
            description: self.description,
            image_path: self.image_path,
            ingredients: self.ingredients.unwrap_or_default(),
        }
    }
}

impl From<Recipe> for RecipeRecord {
    fn from(recipe: Recipe) -> Self {
        Self {
            name: recipe.name,
            description: recipe.description,
            image_path: recipe.image_path,
            ingredients: Some(recipe.ingredients),
        }
    }
}

/// Remote recipe persistence.
pub trait RecipeStorage: Send + Sync {
    /// Fetch every stored recipe.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<RecipeRecord>, StorageError>> + Send;

    /// Replace the stored collection.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    fn save_all(
        &self,
        recipes: Vec<RecipeRecord>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
