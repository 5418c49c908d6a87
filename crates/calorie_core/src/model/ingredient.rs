//! Ingredient domain model.
//!
//! # Invariants
//! - `name` is required and at most 50 characters.
//! - `reference_size` and `kcal` are required finite, non-negative numbers.
//! - Macronutrients are optional; when present they follow the same rule.

use super::validation::{
    validate_optional_quantity, validate_quantity, validate_required_text, ValidationError,
};
use serde::{Deserialize, Serialize};

pub type IngredientId = i64;

pub const INGREDIENT_NAME_MAX_CHARS: usize = 50;

/// Persisted ingredient row.
///
/// Nutrient values describe one reference serving of `reference_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    /// Reference serving size, serialized under its stored name `ssize`.
    #[serde(rename = "ssize")]
    pub reference_size: f64,
    pub kcal: f64,
    pub carbs: Option<f64>,
    pub proteins: Option<f64>,
    pub fats: Option<f64>,
}

impl Ingredient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_ingredient_fields(
            &self.name,
            self.reference_size,
            self.kcal,
            [self.carbs, self.proteins, self.fats],
        )
    }
}

/// Input for creating an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    #[serde(rename = "ssize")]
    pub reference_size: f64,
    pub kcal: f64,
    pub carbs: Option<f64>,
    pub proteins: Option<f64>,
    pub fats: Option<f64>,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, reference_size: f64, kcal: f64) -> Self {
        Self {
            name: name.into(),
            reference_size,
            kcal,
            carbs: None,
            proteins: None,
            fats: None,
        }
    }

    /// Sets all three macronutrients at once.
    pub fn with_macros(mut self, carbs: f64, proteins: f64, fats: f64) -> Self {
        self.carbs = Some(carbs);
        self.proteins = Some(proteins);
        self.fats = Some(fats);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_ingredient_fields(
            &self.name,
            self.reference_size,
            self.kcal,
            [self.carbs, self.proteins, self.fats],
        )
    }
}

fn validate_ingredient_fields(
    name: &str,
    reference_size: f64,
    kcal: f64,
    [carbs, proteins, fats]: [Option<f64>; 3],
) -> Result<(), ValidationError> {
    validate_required_text("ingredient.name", name, INGREDIENT_NAME_MAX_CHARS)?;
    validate_quantity("ingredient.ssize", reference_size)?;
    validate_quantity("ingredient.kcal", kcal)?;
    validate_optional_quantity("ingredient.carbs", carbs)?;
    validate_optional_quantity("ingredient.proteins", proteins)?;
    validate_optional_quantity("ingredient.fats", fats)
}
