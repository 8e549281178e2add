//! Cocktail catalogue entities.
//!
//! A cocktail exclusively owns its ingredients. Identifiers are assigned once
//! and preserved through snapshot and restore so ingredient foreign keys stay
//! valid.

use uuid::Uuid;

/// A cocktail recipe and its ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct Cocktail {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Person or venue credited with the recipe.
    pub creator: String,
    /// Preparation style, e.g. "Shaken".
    pub style: String,
    /// Free-form note.
    pub comment: String,
    /// Menu category.
    pub category: String,
    /// Optional image path.
    pub image_url: Option<String>,
    /// Ingredients, ordered by [`Ingredient::order_index`].
    pub ingredients: Vec<Ingredient>,
}

impl Cocktail {
    /// Number of ingredient rows owned by this cocktail.
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }
}

/// One measured ingredient of a cocktail.
///
/// `volume` is expected to be non-negative but is stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    /// Stable identifier.
    pub id: Uuid,
    /// Measured amount.
    pub volume: f64,
    /// Unit of the amount.
    pub unit: String,
    /// Ingredient name.
    pub name: String,
    /// Optional spirit classification.
    pub tag: Option<String>,
    /// Display position within the owning cocktail.
    pub order_index: i32,
}
