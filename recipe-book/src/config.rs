//! Configuration for the recipe book binary.
//!
//! Loads from environment variables with defaults. Unparseable values fall
//! back to the default rather than failing.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "recipe_book=debug,recipebook_runtime=info";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `tracing-subscriber` filter directive (`RECIPE_BOOK_LOG`)
    pub log_filter: String,
    /// Where the session blob is kept (`RECIPE_BOOK_SESSION_FILE`)
    pub session_file: PathBuf,
    /// Start from the demo recipes and shopping list (`RECIPE_BOOK_SEED_DATA`)
    pub seed_data: bool,
    /// Token lifetime granted by the demo identity provider, in seconds
    /// (`RECIPE_BOOK_DEMO_TOKEN_LIFETIME_SECS`)
    pub demo_token_lifetime_secs: u64,
    /// How far an action observer may lag (`RECIPE_BOOK_ACTION_BROADCAST_CAPACITY`)
    pub action_broadcast_capacity: usize,
}

/// Rejected configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Session file path is empty.
    #[error("session file path must not be empty")]
    EmptySessionFile,

    /// Demo tokens would expire immediately.
    #[error("demo token lifetime must be at least one second")]
    ZeroTokenLifetime,

    /// Broadcast channel needs room for at least one action.
    #[error("action broadcast capacity must be at least 1")]
    ZeroBroadcastCapacity,
}

impl AppConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_filter: lookup("RECIPE_BOOK_LOG").unwrap_or(defaults.log_filter),
            session_file: lookup("RECIPE_BOOK_SESSION_FILE")
                .map_or(defaults.session_file, PathBuf::from),
            seed_data: lookup("RECIPE_BOOK_SEED_DATA")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed_data),
            demo_token_lifetime_secs: lookup("RECIPE_BOOK_DEMO_TOKEN_LIFETIME_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.demo_token_lifetime_secs),
            action_broadcast_capacity: lookup("RECIPE_BOOK_ACTION_BROADCAST_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.action_broadcast_capacity),
        }
    }

    /// Set the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the session file.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Enable or disable demo data.
    #[must_use]
    pub const fn with_seed_data(mut self, seed: bool) -> Self {
        self.seed_data = seed;
        self
    }

    /// Set the demo token lifetime.
    #[must_use]
    pub const fn with_demo_token_lifetime(mut self, secs: u64) -> Self {
        self.demo_token_lifetime_secs = secs;
        self
    }

    /// Set the action broadcast capacity.
    #[must_use]
    pub const fn with_action_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.action_broadcast_capacity = capacity;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptySessionFile);
        }
        if self.demo_token_lifetime_secs == 0 {
            return Err(ConfigError::ZeroTokenLifetime);
        }
        if self.action_broadcast_capacity == 0 {
            return Err(ConfigError::ZeroBroadcastCapacity);
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            session_file: PathBuf::from("recipe-book-session.json"),
            seed_data: true,
            demo_token_lifetime_secs: 3600,
            action_broadcast_capacity: 16,
        }
    }
}
