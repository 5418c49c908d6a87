//! Meal domain model.
//!
//! # Invariants
//! - Every meal belongs to exactly one user through `user_id`.
//! - `name` is required and at most 50 characters.
//! - `description` is optional and at most 255 characters.

use super::user::UserId;
use super::validation::{validate_optional_text, validate_required_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type MealId = i64;

pub const MEAL_NAME_MAX_CHARS: usize = 50;
pub const MEAL_DESCRIPTION_MAX_CHARS: usize = 255;

/// Persisted meal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: MealId,
    /// Owning user. Changing it moves the meal to another user.
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
}

impl Meal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_meal_fields(&self.name, self.description.as_deref())
    }
}

/// Input for creating a meal owned by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
}

impl NewMeal {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_meal_fields(&self.name, self.description.as_deref())
    }
}

fn validate_meal_fields(name: &str, description: Option<&str>) -> Result<(), ValidationError> {
    validate_required_text("meal.name", name, MEAL_NAME_MAX_CHARS)?;
    validate_optional_text("meal.description", description, MEAL_DESCRIPTION_MAX_CHARS)
}
