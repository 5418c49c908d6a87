//! Domain model for the calorie tracker.
//!
//! # Responsibility
//! - Define the four persisted entity shapes and their write inputs.
//! - Provide validation that runs before any write reaches storage.
//!
//! # Invariants
//! - Relationships are plain foreign-key ids; no entity owns another.
//! - Ids are assigned by storage and never reused.

use std::fmt::{Display, Formatter};

pub mod ingredient;
pub mod meal;
pub mod meal_ingredient;
pub mod user;
pub mod validation;

use ingredient::IngredientId;
use meal::MealId;
use user::UserId;

/// Identity of one persisted row, used to report missing or conflicting rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    User(UserId),
    Meal(MealId),
    Ingredient(IngredientId),
    MealIngredient {
        meal_id: MealId,
        ingredient_id: IngredientId,
    },
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user {id}"),
            Self::Meal(id) => write!(f, "meal {id}"),
            Self::Ingredient(id) => write!(f, "ingredient {id}"),
            Self::MealIngredient {
                meal_id,
                ingredient_id,
            } => write!(f, "ingredient {ingredient_id} in meal {meal_id}"),
        }
    }
}
