//! Core data model and storage layer for the calorie tracker.
//! This crate is the single source of truth for referential-integrity rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use db::{DbConfig, DbError, DbLocation, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ingredient::{Ingredient, IngredientId, NewIngredient};
pub use model::meal::{Meal, MealId, NewMeal};
pub use model::meal_ingredient::{MealIngredient, MealIngredientEntry};
pub use model::user::{NewUser, User, UserId};
pub use model::validation::ValidationError;
pub use model::EntityRef;
pub use repo::ingredient_repo::{IngredientRepository, SqliteIngredientRepository};
pub use repo::meal_ingredient_repo::{MealIngredientRepository, SqliteMealIngredientRepository};
pub use repo::meal_repo::{MealRepository, SqliteMealRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult, TrackerRepository};
pub use seed::{seed_sample_data, SeedSummary};
pub use service::tracker_service::{MealDetail, ServiceError, ServiceResult, TrackerService};
pub use store::{Store, UnitOfWork};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
