//! # Recipe Book
//!
//! Reactive state core for a recipe book: authentication with session
//! expiry, an index-addressed recipe collection, and a shopping list, all
//! held in one store and observed through per-domain selections.
//!
//! ## Architecture
//!
//! ```text
//! Service call → AppAction → AppReducer → (AppState, Effects)
//!                                  │              │
//!                          selections notified    └→ provider round trip → AppAction
//! ```
//!
//! Reducers are pure. The identity provider, session persistence, and the
//! clock reach them through [`AppEnvironment`]; the auth reducer returns
//! effect descriptions that the runtime executes and feeds back.
//!
//! ## Example
//!
//! ```rust,ignore
//! use recipe_book::{AppState, auth::AuthService, build_store};
//!
//! let store = build_store(AppState::seeded(), env, 16);
//! let auth = AuthService::new(store.clone());
//! auth.login("cook@example.com", "hunter22").await;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod actions;
pub mod auth;
pub mod config;
pub mod environment;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod model;
pub mod overlay;
pub mod providers;
pub mod recipes;
pub mod reducer;
pub mod selectors;
pub mod shopping_list;
pub mod state;
pub mod storage;

pub use actions::AppAction;
pub use config::{AppConfig, ConfigError};
pub use environment::AppEnvironment;
pub use error::{IndexError, InvalidIngredient, StorageError};
pub use model::{Ingredient, Recipe};
pub use reducer::AppReducer;
pub use state::AppState;

use recipebook_runtime::Store;

/// The application store.
pub type AppStore<I, P, C> = Store<AppState, AppAction, AppEnvironment<I, P, C>, AppReducer<I, P, C>>;

/// Create the application store.
///
/// `broadcast_capacity` bounds how far an observer of effect-produced
/// actions may fall behind.
#[must_use]
pub fn build_store<I, P, C>(
    initial: AppState,
    environment: AppEnvironment<I, P, C>,
    broadcast_capacity: usize,
) -> AppStore<I, P, C>
where
    I: providers::IdentityProvider + 'static,
    P: providers::SessionStorage + 'static,
    C: recipebook_core::environment::Clock + 'static,
{
    Store::with_broadcast_capacity(initial, AppReducer::new(), environment, broadcast_capacity)
}
