//! Sample fixture used for manual testing against a fresh database.
//!
//! # Invariants
//! - All rows are written through one repository handle; callers pass a unit
//!   of work so the fixture lands completely or not at all.
//! - Link rows reference the ids returned by the inserts, never literal ids.

use crate::model::ingredient::{Ingredient, NewIngredient};
use crate::model::meal::{Meal, NewMeal};
use crate::model::meal_ingredient::MealIngredient;
use crate::model::user::{NewUser, User};
use crate::repo::{RepoResult, TrackerRepository};
use log::info;

/// Row counts written by `seed_sample_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub ingredients: usize,
    pub meals: usize,
    pub meal_ingredients: usize,
}

/// Inserts the sample users, ingredients, meals and meal links.
///
/// # Errors
/// - `RepoError::Uniqueness` when the sample users already exist.
pub fn seed_sample_data<R: TrackerRepository + ?Sized>(repo: &R) -> RepoResult<SeedSummary> {
    let users = ["TestUser1", "TestUser2", "TestUser3", "TestUser4"]
        .into_iter()
        .map(|name| repo.create_user(&NewUser::new(name)))
        .collect::<RepoResult<Vec<User>>>()?;

    let ingredients = [
        NewIngredient::new("Tomato", 100.0, 23.0).with_macros(62.0, 10.0, 12.0),
        NewIngredient::new("Potato", 150.0, 112.0).with_macros(125.0, 15.0, 2.0),
        NewIngredient::new("Beer", 330.0, 142.0).with_macros(128.0, 13.0, 0.0),
        NewIngredient::new("Ground beef", 400.0, 648.0).with_macros(0.0, 208.0, 192.0),
        NewIngredient::new("Egg", 60.0, 80.0).with_macros(0.0, 23.0, 36.0),
        NewIngredient::new("Lazy potato", 150.0, 110.0),
    ]
    .iter()
    .map(|ingredient| repo.create_ingredient(ingredient))
    .collect::<RepoResult<Vec<Ingredient>>>()?;

    let meals = [
        NewMeal::new(users[2].id, "Breakfast").with_description("Sunday morning breakfast"),
        NewMeal::new(users[0].id, "Dinner"),
        NewMeal::new(users[1].id, "Breakfast").with_description("Omelette with tomatoes"),
    ]
    .iter()
    .map(|meal| repo.create_meal(meal))
    .collect::<RepoResult<Vec<Meal>>>()?;

    // (meal index, ingredient index, used size)
    let links = [
        (0, 2, 6.0),
        (1, 1, 3.0),
        (1, 3, 0.3),
        (2, 4, 2.0),
        (2, 0, 3.0),
    ];
    for (meal, ingredient, used_size) in links {
        repo.link_ingredient(&MealIngredient::new(
            meals[meal].id,
            ingredients[ingredient].id,
            used_size,
        ))?;
    }

    let summary = SeedSummary {
        users: users.len(),
        ingredients: ingredients.len(),
        meals: meals.len(),
        meal_ingredients: links.len(),
    };
    info!(
        "event=seed module=seed status=ok users={} ingredients={} meals={} meal_ingredients={}",
        summary.users, summary.ingredients, summary.meals, summary.meal_ingredients
    );
    Ok(summary)
}
