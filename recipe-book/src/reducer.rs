//! Root reducer.
//!
//! Routes each action to the reducer owning its domain and lifts the
//! returned effects back into [`AppAction`].

use crate::actions::AppAction;
use crate::auth::AuthReducer;
use crate::environment::AppEnvironment;
use crate::providers::{IdentityProvider, SessionStorage};
use crate::recipes::RecipesReducer;
use crate::shopping_list::ShoppingListReducer;
use crate::state::AppState;
use recipebook_core::effect::Effect;
use recipebook_core::environment::Clock;
use recipebook_core::reducer::Reducer;
use recipebook_core::{SmallVec, smallvec};

/// Root reducer over [`AppState`].
pub struct AppReducer<I, P, C> {
    auth: AuthReducer<I, P, C>,
    recipes: RecipesReducer,
    shopping_list: ShoppingListReducer,
}

impl<I, P, C> AppReducer<I, P, C> {
    /// Create a new root reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            auth: AuthReducer::new(),
            recipes: RecipesReducer,
            shopping_list: ShoppingListReducer,
        }
    }
}

impl<I, P, C> Default for AppReducer<I, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, C> Reducer for AppReducer<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<I, P, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Auth(action) => self
                .auth
                .reduce(&mut state.auth, action, env)
                .into_iter()
                .map(|effect| effect.map(AppAction::Auth))
                .collect(),
            AppAction::Recipes(action) => {
                let _ = self.recipes.reduce(&mut state.recipes, action, &());
                smallvec![Effect::None]
            },
            AppAction::ShoppingList(action) => {
                let _ = self.shopping_list.reduce(&mut state.shopping_list, action, &());
                smallvec![Effect::None]
            },
        }
    }
}
