//! Recipe collection reducer.
//!
//! Index checks for `Update` and `Delete` happen in [`super::RecipeService`]
//! under the store lock. An out-of-range index that reaches the reducer
//! anyway (a direct dispatch) is logged and ignored.

use crate::model::Recipe;
use recipebook_core::effect::Effect;
use recipebook_core::reducer::Reducer;
use recipebook_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Recipe collection actions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipesAction {
    /// Replace the whole collection
    Set {
        /// New collection
        recipes: Vec<Recipe>,
    },
    /// Append a recipe
    Add {
        /// Recipe to append
        recipe: Recipe,
    },
    /// Replace the recipe at `index`
    Update {
        /// Position to replace
        index: usize,
        /// Replacement
        recipe: Recipe,
    },
    /// Remove the recipe at `index`, shifting later entries down
    Delete {
        /// Position to remove
        index: usize,
    },
}

/// Recipe collection reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipesReducer;

impl Reducer for RecipesReducer {
    type State = Arc<Vec<Recipe>>;
    type Action = RecipesAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &(),
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RecipesAction::Set { recipes } => {
                tracing::debug!(count = recipes.len(), "Replacing recipe collection");
                *state = Arc::new(recipes);
            },
            RecipesAction::Add { recipe } => {
                Arc::make_mut(state).push(recipe);
            },
            RecipesAction::Update { index, recipe } => {
                if index < state.len() {
                    Arc::make_mut(state)[index] = recipe;
                } else {
                    tracing::warn!(index, len = state.len(), "Ignoring update of missing recipe");
                }
            },
            RecipesAction::Delete { index } => {
                if index < state.len() {
                    Arc::make_mut(state).remove(index);
                } else {
                    tracing::warn!(index, len = state.len(), "Ignoring delete of missing recipe");
                }
            },
        }
        smallvec![Effect::None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebook_testing::{ReducerTest, assertions};

    fn recipe(name: &str) -> Recipe {
        Recipe::new(name, format!("{name} description"), format!("{name}.png"), Vec::new())
    }

    #[test]
    fn add_appends() {
        ReducerTest::new(RecipesReducer)
            .with_env(())
            .given_state(Arc::new(vec![recipe("R1")]))
            .when_action(RecipesAction::Add { recipe: recipe("R2") })
            .then_state(|recipes| assert_eq!(**recipes, vec![recipe("R1"), recipe("R2")]))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn delete_shifts_later_entries() {
        ReducerTest::new(RecipesReducer)
            .with_env(())
            .given_state(Arc::new(Vec::new()))
            .given_actions(vec![
                RecipesAction::Add { recipe: recipe("R1") },
                RecipesAction::Add { recipe: recipe("R2") },
            ])
            .when_action(RecipesAction::Delete { index: 0 })
            .then_state(|recipes| assert_eq!(**recipes, vec![recipe("R2")]))
            .run();
    }

    #[test]
    fn update_replaces_in_place() {
        ReducerTest::new(RecipesReducer)
            .with_env(())
            .given_state(Arc::new(vec![recipe("R1"), recipe("R2")]))
            .when_action(RecipesAction::Update { index: 1, recipe: recipe("R3") })
            .then_state(|recipes| assert_eq!(**recipes, vec![recipe("R1"), recipe("R3")]))
            .run();
    }

    #[test]
    fn out_of_range_dispatch_is_ignored_without_replacing_the_slice() {
        let mut state = Arc::new(vec![recipe("R1")]);
        let before = Arc::clone(&state);

        let _ = RecipesReducer.reduce(&mut state, RecipesAction::Delete { index: 1 }, &());
        let _ = RecipesReducer.reduce(
            &mut state,
            RecipesAction::Update { index: 7, recipe: recipe("R9") },
            &(),
        );

        assert!(Arc::ptr_eq(&before, &state));
    }

    #[test]
    fn set_replaces_the_collection() {
        ReducerTest::new(RecipesReducer)
            .with_env(())
            .given_state(Arc::new(vec![recipe("R1")]))
            .when_action(RecipesAction::Set { recipes: vec![recipe("R7"), recipe("R8")] })
            .then_state(|recipes| assert_eq!(recipes.len(), 2))
            .run();
    }
}
