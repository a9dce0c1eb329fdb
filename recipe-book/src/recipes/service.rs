//! Recipe collection facade and remote synchronisation.

use super::reducer::RecipesAction;
use crate::error::{IndexError, StorageError};
use crate::model::Recipe;
use crate::providers::{IdentityProvider, RecipeRecord, RecipeStorage, SessionStorage};
use crate::shopping_list::ShoppingListAction;
use crate::state::AppState;
use crate::{AppStore, selectors};
use recipebook_core::environment::Clock;
use recipebook_runtime::{EffectHandle, Selection};
use std::sync::Arc;

/// Index-addressed recipe collection.
///
/// Every successful mutation replaces the collection exactly once, so each
/// [`RecipeService::changes`] subscriber sees one new snapshot per call.
pub struct RecipeService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    store: AppStore<I, P, C>,
}

impl<I, P, C> RecipeService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    /// Wrap `store`.
    #[must_use]
    pub const fn new(store: AppStore<I, P, C>) -> Self {
        Self { store }
    }

    /// Replace the whole collection.
    pub async fn set_all(&self, recipes: Vec<Recipe>) -> EffectHandle {
        self.store.send(RecipesAction::Set { recipes }.into()).await
    }

    /// Append a recipe.
    pub async fn add(&self, recipe: Recipe) -> EffectHandle {
        self.store.send(RecipesAction::Add { recipe }.into()).await
    }

    /// Replace the recipe at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index` is past the end; the
    /// collection is left untouched and nothing is emitted.
    pub async fn update(&self, index: usize, recipe: Recipe) -> Result<EffectHandle, IndexError> {
        self.store
            .send_checked(RecipesAction::Update { index, recipe }.into(), move |state: &AppState| {
                IndexError::check(index, state.recipes.len())
            })
            .await
    }

    /// Remove the recipe at `index`; later recipes move down by one.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index` is past the end.
    pub async fn delete(&self, index: usize) -> Result<EffectHandle, IndexError> {
        self.store
            .send_checked(RecipesAction::Delete { index }.into(), move |state: &AppState| {
                IndexError::check(index, state.recipes.len())
            })
            .await
    }

    /// Snapshot of the collection. Later mutations do not affect it.
    pub async fn get_all(&self) -> Arc<Vec<Recipe>> {
        self.store.state(selectors::recipes).await
    }

    /// The recipe at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index` is past the end.
    pub async fn get_by_id(&self, index: usize) -> Result<Recipe, IndexError> {
        self.store
            .state(|state| {
                state.recipes.get(index).cloned().ok_or(IndexError::OutOfRange {
                    index,
                    len: state.recipes.len(),
                })
            })
            .await
    }

    /// Append the ingredients of the recipe at `index` to the shopping list
    /// as one batch.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index` is past the end.
    pub async fn add_ingredients_to_shopping_list(
        &self,
        index: usize,
    ) -> Result<EffectHandle, IndexError> {
        let recipe = self.get_by_id(index).await?;
        tracing::debug!(recipe = %recipe.name, count = recipe.ingredients.len(), "Sending ingredients to shopping list");
        Ok(self
            .store
            .send(
                ShoppingListAction::AddIngredients {
                    ingredients: recipe.ingredients,
                }
                .into(),
            )
            .await)
    }

    /// The collection now and after every change.
    pub async fn changes(&self) -> Selection<Vec<Recipe>> {
        self.store.select(selectors::recipes).await
    }
}

impl<I, P, C> Clone for RecipeService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Moves the collection to and from remote recipe persistence.
///
/// Works only through [`RecipeService::set_all`] and
/// [`RecipeService::get_all`].
pub struct DataStorage<R, I, P, C>
where
    R: RecipeStorage,
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    storage: Arc<R>,
    recipes: RecipeService<I, P, C>,
}

impl<R, I, P, C> DataStorage<R, I, P, C>
where
    R: RecipeStorage,
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    /// Sync `recipes` with `storage`.
    #[must_use]
    pub const fn new(storage: Arc<R>, recipes: RecipeService<I, P, C>) -> Self {
        Self { storage, recipes }
    }

    /// Replace the local collection with the remote one.
    ///
    /// Records stored without ingredients come back with an empty list.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the local collection is then unchanged.
    pub async fn fetch_recipes(&self) -> Result<Arc<Vec<Recipe>>, StorageError> {
        let records = self.storage.fetch_all().await?;
        let recipes: Vec<Recipe> = records.into_iter().map(RecipeRecord::into_recipe).collect();
        tracing::info!(count = recipes.len(), "Fetched recipes");

        let _ = self.recipes.set_all(recipes).await;
        Ok(self.recipes.get_all().await)
    }

    /// Save the local collection remotely.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn store_recipes(&self) -> Result<(), StorageError> {
        let recipes = self.recipes.get_all().await;
        let records: Vec<RecipeRecord> = recipes.iter().cloned().map(RecipeRecord::from).collect();
        tracing::info!(count = records.len(), "Storing recipes");
        self.storage.save_all(records).await
    }
}
