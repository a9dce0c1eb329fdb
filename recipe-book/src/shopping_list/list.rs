//! The shopping list value.

use crate::model::Ingredient;

/// Ordered ingredients to buy.
///
/// Entries are never merged: adding "Meat 1" to a list holding "Meat 20"
/// yields two entries. [`ShoppingList::totals`] offers a summed view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    items: Vec<Ingredient>,
}

impl ShoppingList {
    /// Create a list from existing entries.
    #[must_use]
    pub const fn new(items: Vec<Ingredient>) -> Self {
        Self { items }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Ingredient] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, ingredient: Ingredient) {
        self.items.push(ingredient);
    }

    pub(crate) fn append(&mut self, ingredients: Vec<Ingredient>) {
        self.items.extend(ingredients);
    }

    /// Amounts summed per name, in first-seen order.
    ///
    /// A derived view; the stored entries are left untouched.
    #[must_use]
    pub fn totals(&self) -> Vec<Ingredient> {
        let mut totals: Vec<Ingredient> = Vec::new();
        for item in &self.items {
            match totals.iter_mut().find(|t| t.name == item.name) {
                Some(total) => total.amount += item.amount,
                None => totals.push(item.clone()),
            }
        }
        totals
    }
}

impl From<Vec<Ingredient>> for ShoppingList {
    fn from(items: Vec<Ingredient>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_by_name_in_first_seen_order() {
        let list = ShoppingList::new(vec![
            Ingredient::new("Meat", 20.0),
            Ingredient::new("Rice", 1.0),
            Ingredient::new("Meat", 1.0),
        ]);

        assert_eq!(
            list.totals(),
            vec![Ingredient::new("Meat", 21.0), Ingredient::new("Rice", 1.0)]
        );
        assert_eq!(list.len(), 3, "entries are not merged");
    }
}
