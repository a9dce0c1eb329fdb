//! Domain selectors for [`Store::select`](recipebook_runtime::Store::select).
//!
//! Each returns the slice's `Arc`, so a selection only emits when the
//! reducer replaced that slice.

use crate::auth::AuthState;
use crate::model::Recipe;
use crate::shopping_list::ShoppingList;
use crate::state::AppState;
use std::sync::Arc;

/// The authentication slice.
#[must_use]
pub fn auth(state: &AppState) -> Arc<AuthState> {
    Arc::clone(&state.auth)
}

/// The recipe collection.
#[must_use]
pub fn recipes(state: &AppState) -> Arc<Vec<Recipe>> {
    Arc::clone(&state.recipes)
}

/// The shopping list.
#[must_use]
pub fn shopping_list(state: &AppState) -> Arc<ShoppingList> {
    Arc::clone(&state.shopping_list)
}
