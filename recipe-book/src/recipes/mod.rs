//! Recipe collection: actions, reducer, and the service facade.

pub mod reducer;
pub mod service;

pub use reducer::{RecipesAction, RecipesReducer};
pub use service::{DataStorage, RecipeService};
