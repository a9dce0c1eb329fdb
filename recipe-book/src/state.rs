//! Application state.

use crate::auth::AuthState;
use crate::model::{Ingredient, Recipe};
use crate::shopping_list::ShoppingList;
use std::sync::Arc;

const CURRY_IMAGE: &str = "https://images.unsplash.com/photo-1585937421612-70a008356fbe?ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&ixlib=rb-1.2.1&auto=format&fit=crop&w=1576&q=80";
const BURGER_IMAGE: &str = "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&ixlib=rb-1.2.1&auto=format&fit=crop&w=602&q=80";

/// Process-wide application state.
///
/// Each domain slice sits behind its own `Arc`. A dispatch clones the
/// struct (three pointer copies) and the owning reducer replaces only the
/// slice it changes, so a committed snapshot is never mutated afterwards
/// and untouched slices keep their identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Authentication slice
    pub auth: Arc<AuthState>,
    /// Recipe collection, index-addressed
    pub recipes: Arc<Vec<Recipe>>,
    /// Shopping list
    pub shopping_list: Arc<ShoppingList>,
}

impl AppState {
    /// State preloaded with the demo recipes and shopping list.
    #[must_use]
    pub fn seeded() -> Self {
        let recipes = vec![
            Recipe::new(
                "Curry",
                "Flavorful curry",
                CURRY_IMAGE,
                vec![
                    Ingredient::new("Rice", 1.0),
                    Ingredient::new("Meat", 20.0),
                    Ingredient::new("Curry Powder", 2.0),
                ],
            ),
            Recipe::new(
                "Burger",
                "Juicy pure beef burger",
                BURGER_IMAGE,
                vec![Ingredient::new("Bread", 2.0), Ingredient::new("Meat", 1.0)],
            ),
        ];
        let shopping_list =
            ShoppingList::new(vec![Ingredient::new("apples", 5.0), Ingredient::new("oranges", 2.0)]);

        Self {
            auth: Arc::default(),
            recipes: Arc::new(recipes),
            shopping_list: Arc::new(shopping_list),
        }
    }
}
