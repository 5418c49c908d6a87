//! Meal/ingredient association model.
//!
//! # Invariants
//! - Identity is the `(meal_id, ingredient_id)` pair; a pair exists at most once.
//! - `used_size` is the quantity used in this meal and is independent of the
//!   ingredient's reference serving size.

use super::ingredient::{Ingredient, IngredientId};
use super::meal::MealId;
use super::validation::{validate_quantity, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted join row between one meal and one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealIngredient {
    pub meal_id: MealId,
    pub ingredient_id: IngredientId,
    #[serde(rename = "ssize")]
    pub used_size: f64,
}

impl MealIngredient {
    pub fn new(meal_id: MealId, ingredient_id: IngredientId, used_size: f64) -> Self {
        Self {
            meal_id,
            ingredient_id,
            used_size,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_used_size(self.used_size)
    }
}

/// Read model for one ingredient line of a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIngredientEntry {
    pub ingredient: Ingredient,
    #[serde(rename = "ssize")]
    pub used_size: f64,
}

pub fn validate_used_size(used_size: f64) -> Result<(), ValidationError> {
    validate_quantity("ingredients_in_meal.ssize", used_size)
}
