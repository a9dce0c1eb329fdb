//! Shopping list reducer.

use super::list::ShoppingList;
use crate::model::Ingredient;
use recipebook_core::effect::Effect;
use recipebook_core::reducer::Reducer;
use recipebook_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Shopping list actions.
#[derive(Debug, Clone, PartialEq)]
pub enum ShoppingListAction {
    /// Append one ingredient
    AddIngredient {
        /// Ingredient to append
        ingredient: Ingredient,
    },
    /// Append a batch of ingredients as a single transition
    AddIngredients {
        /// Ingredients to append, in order
        ingredients: Vec<Ingredient>,
    },
}

/// Shopping list reducer.
///
/// Invalid amounts are rejected by [`super::ShoppingListService`]; if one
/// arrives here through a direct dispatch the whole action is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoppingListReducer;

impl Reducer for ShoppingListReducer {
    type State = Arc<ShoppingList>;
    type Action = ShoppingListAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &(),
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ShoppingListAction::AddIngredient { ingredient } => match ingredient.validate() {
                Ok(()) => Arc::make_mut(state).push(ingredient),
                Err(error) => tracing::warn!(%error, "Ignoring invalid ingredient"),
            },
            ShoppingListAction::AddIngredients { ingredients } => {
                match ingredients.iter().try_for_each(Ingredient::validate) {
                    Ok(()) => {
                        tracing::debug!(count = ingredients.len(), "Appending ingredients");
                        Arc::make_mut(state).append(ingredients);
                    },
                    Err(error) => tracing::warn!(%error, "Ignoring batch with invalid ingredient"),
                }
            },
        }
        smallvec![Effect::None]
    }
}
