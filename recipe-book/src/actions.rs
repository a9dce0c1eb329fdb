//! Root action type.

use crate::auth::AuthAction;
use crate::recipes::RecipesAction;
use crate::shopping_list::ShoppingListAction;

/// Every action the application store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Authentication lifecycle
    Auth(AuthAction),
    /// Recipe collection
    Recipes(RecipesAction),
    /// Shopping list
    ShoppingList(ShoppingListAction),
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<RecipesAction> for AppAction {
    fn from(action: RecipesAction) -> Self {
        Self::Recipes(action)
    }
}

impl From<ShoppingListAction> for AppAction {
    fn from(action: ShoppingListAction) -> Self {
        Self::ShoppingList(action)
    }
}
