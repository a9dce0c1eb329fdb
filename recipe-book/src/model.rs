//! Recipe and ingredient value types.

use crate::error::InvalidIngredient;
use serde::{Deserialize, Serialize};

/// A named amount of something.
///
/// Value type: two ingredients with the same name are still two entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name
    pub name: String,
    /// Quantity, finite and greater than zero
    pub amount: f64,
}

impl Ingredient {
    /// Create an ingredient. Validation happens at the service boundary.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// Check that the amount is usable.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIngredient::Amount`] for zero, negative or
    /// non-finite amounts.
    pub fn validate(&self) -> Result<(), InvalidIngredient> {
        if self.amount.is_finite() && self.amount > 0.0 {
            Ok(())
        } else {
            Err(InvalidIngredient::Amount {
                name: self.name.clone(),
                amount: self.amount,
            })
        }
    }
}

/// A recipe. Its identity is its position in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Image URI
    pub image_path: String,
    /// Ingredients, in display order
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Create a recipe.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_path: impl Into<String>,
        ingredients: Vec<Ingredient>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image_path: image_path.into(),
            ingredients,
        }
    }
}
