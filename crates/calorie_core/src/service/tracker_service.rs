//! Resource-level use cases over the tracker repositories.
//!
//! # Responsibility
//! - Serve the user-scoped and item-level reads/writes that the HTTP layer
//!   maps its paths onto.
//! - Turn absence into `NotFound` where a resource path requires a row.
//!
//! # Invariants
//! - A meal addressed under a user must belong to that user.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::ingredient::{Ingredient, IngredientId};
use crate::model::meal::{Meal, MealId, NewMeal};
use crate::model::meal_ingredient::MealIngredientEntry;
use crate::model::user::{User, UserId};
use crate::model::EntityRef;
use crate::repo::{RepoError, TrackerRepository};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for resource-level use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Addressed row does not exist.
    NotFound(EntityRef),
    /// No user carries the addressed name.
    UserNameNotFound(String),
    /// Meal exists but is owned by another user.
    MealNotOwned { user_id: UserId, meal_id: MealId },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::UserNameNotFound(name) => write!(f, "user `{name}` not found"),
            Self::MealNotOwned { user_id, meal_id } => {
                write!(f, "meal {meal_id} does not belong to user {user_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(target) => Self::NotFound(target),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One meal with its ingredient lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDetail {
    pub meal: Meal,
    pub ingredients: Vec<MealIngredientEntry>,
}

/// Resource service borrowing a repository (usually a unit of work).
pub struct TrackerService<'r, R: TrackerRepository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: TrackerRepository + ?Sized> TrackerService<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    pub fn require_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.repo
            .get_user(user_id)?
            .ok_or(ServiceError::NotFound(EntityRef::User(user_id)))
    }

    /// Resolves a user by exact name.
    pub fn require_user_by_name(&self, name: &str) -> ServiceResult<User> {
        self.repo
            .find_user_by_name(name)?
            .ok_or_else(|| ServiceError::UserNameNotFound(name.to_string()))
    }

    pub fn require_meal(&self, meal_id: MealId) -> ServiceResult<Meal> {
        self.repo
            .get_meal(meal_id)?
            .ok_or(ServiceError::NotFound(EntityRef::Meal(meal_id)))
    }

    pub fn require_ingredient(&self, ingredient_id: IngredientId) -> ServiceResult<Ingredient> {
        self.repo
            .get_ingredient(ingredient_id)?
            .ok_or(ServiceError::NotFound(EntityRef::Ingredient(ingredient_id)))
    }

    /// Renames a user by loading, mutating and writing it back.
    pub fn rename_user(&self, user_id: UserId, name: impl Into<String>) -> ServiceResult<User> {
        let mut user = self.require_user(user_id)?;
        user.name = name.into();
        self.repo.update_user(&user)?;
        Ok(user)
    }

    /// Lists a user's meals; a missing user is `NotFound`, not an empty list.
    pub fn user_meals(&self, user_id: UserId) -> ServiceResult<Vec<Meal>> {
        self.require_user(user_id)?;
        Ok(self.repo.list_meals_for_user(user_id)?)
    }

    pub fn user_meal(&self, user_id: UserId, meal_id: MealId) -> ServiceResult<Meal> {
        self.require_user(user_id)?;
        let meal = self.require_meal(meal_id)?;
        if meal.user_id != user_id {
            return Err(ServiceError::MealNotOwned { user_id, meal_id });
        }
        Ok(meal)
    }

    pub fn create_user_meal(
        &self,
        user_id: UserId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> ServiceResult<Meal> {
        self.require_user(user_id)?;
        let meal = NewMeal {
            user_id,
            name: name.into(),
            description,
        };
        Ok(self.repo.create_meal(&meal)?)
    }

    /// Writes back a meal addressed under `user_id`.
    ///
    /// The meal must currently belong to `user_id` and may not be moved to
    /// another user through this path.
    pub fn update_user_meal(&self, user_id: UserId, meal: &Meal) -> ServiceResult<()> {
        self.user_meal(user_id, meal.id)?;
        if meal.user_id != user_id {
            return Err(ServiceError::MealNotOwned {
                user_id,
                meal_id: meal.id,
            });
        }
        self.repo.update_meal(meal)?;
        Ok(())
    }

    pub fn delete_user_meal(&self, user_id: UserId, meal_id: MealId) -> ServiceResult<()> {
        self.user_meal(user_id, meal_id)?;
        self.repo.delete_meal(meal_id)?;
        Ok(())
    }

    pub fn meal_detail(&self, meal_id: MealId) -> ServiceResult<MealDetail> {
        let meal = self.require_meal(meal_id)?;
        let ingredients = self.repo.list_meal_ingredients(meal_id)?;
        Ok(MealDetail { meal, ingredients })
    }
}
