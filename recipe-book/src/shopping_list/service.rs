//! Shopping list facade.

use super::list::ShoppingList;
use super::reducer::ShoppingListAction;
use crate::error::InvalidIngredient;
use crate::model::Ingredient;
use crate::providers::{IdentityProvider, SessionStorage};
use crate::{AppStore, selectors};
use recipebook_core::environment::Clock;
use recipebook_runtime::{EffectHandle, Selection};
use std::sync::Arc;

/// Shopping list entry point.
pub struct ShoppingListService<I, P, C>
where
    I: IdentityProvider + 'static,
    P: SessionStorage + 'static,
    C: Clock + 'static,
{
    store: AppStore<I, P, C>,
}

impl<I, P, C> ShoppingListService<I, P, C>
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

    /// Append one ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIngredient`] if the amount is not a positive
    /// finite number; nothing is dispatched.
    pub async fn add_one(&self, ingredient: Ingredient) -> Result<EffectHandle, InvalidIngredient> {
        ingredient.validate()?;
        Ok(self
            .store
            .send(ShoppingListAction::AddIngredient { ingredient }.into())
            .await)
    }

    /// Append every ingredient, in order, as a single change.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidIngredient`]; none of the batch is added.
    pub async fn add_many(
        &self,
        ingredients: Vec<Ingredient>,
    ) -> Result<EffectHandle, InvalidIngredient> {
        ingredients.iter().try_for_each(Ingredient::validate)?;
        Ok(self
            .store
            .send(ShoppingListAction::AddIngredients { ingredients }.into())
            .await)
    }

    /// Snapshot of the list.
    pub async fn get_all(&self) -> Arc<ShoppingList> {
        self.store.state(selectors::shopping_list).await
    }

    /// The list now and after every change.
    pub async fn changes(&self) -> Selection<ShoppingList> {
        self.store.select(selectors::shopping_list).await
    }
}

impl<I, P, C> Clone for ShoppingListService<I, P, C>
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
