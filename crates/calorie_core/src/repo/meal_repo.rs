//! Meal repository contract and SQLite implementation.
//!
//! # Invariants
//! - `meals.user_id` must reference an existing user on insert and update.
//! - Deleting a meal cascades to its ingredient links.

use super::{constraint_kind, count_rows, ConstraintKind, RepoError, RepoResult};
use crate::model::meal::{Meal, MealId, NewMeal};
use crate::model::user::UserId;
use crate::model::EntityRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEAL_SELECT_SQL: &str = "SELECT id, user_id, name, description FROM meals";

/// Repository interface for meal CRUD operations.
pub trait MealRepository {
    fn create_meal(&self, meal: &NewMeal) -> RepoResult<Meal>;
    fn get_meal(&self, id: MealId) -> RepoResult<Option<Meal>>;
    /// Returns the earliest inserted meal with exactly this name.
    fn find_meal_by_name(&self, name: &str) -> RepoResult<Option<Meal>>;
    /// Lists all meals in insertion order.
    fn list_meals(&self) -> RepoResult<Vec<Meal>>;
    /// Lists one user's meals in insertion order. Unknown users yield an empty list.
    fn list_meals_for_user(&self, user_id: UserId) -> RepoResult<Vec<Meal>>;
    fn count_meals(&self) -> RepoResult<u64>;
    fn update_meal(&self, meal: &Meal) -> RepoResult<()>;
    fn delete_meal(&self, id: MealId) -> RepoResult<()>;
}

/// SQLite-backed meal repository.
pub struct SqliteMealRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMealRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_meals(&self, sql: &str, user_id: Option<UserId>) -> RepoResult<Vec<Meal>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match user_id {
            Some(user_id) => stmt.query([user_id])?,
            None => stmt.query([])?,
        };
        let mut meals = Vec::new();
        while let Some(row) = rows.next()? {
            meals.push(checked_meal(read_meal_row(row)?)?);
        }
        Ok(meals)
    }
}

impl MealRepository for SqliteMealRepository<'_> {
    fn create_meal(&self, meal: &NewMeal) -> RepoResult<Meal> {
        meal.validate()?;

        self.conn
            .execute(
                "INSERT INTO meals (user_id, name, description) VALUES (?1, ?2, ?3);",
                params![meal.user_id, meal.name.as_str(), meal.description.as_deref()],
            )
            .map_err(|err| map_owner_violation(err, meal.user_id))?;

        Ok(Meal {
            id: self.conn.last_insert_rowid(),
            user_id: meal.user_id,
            name: meal.name.clone(),
            description: meal.description.clone(),
        })
    }

    fn get_meal(&self, id: MealId) -> RepoResult<Option<Meal>> {
        let row = self
            .conn
            .query_row(
                &format!("{MEAL_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_meal_row,
            )
            .optional()?;
        row.map(checked_meal).transpose()
    }

    fn find_meal_by_name(&self, name: &str) -> RepoResult<Option<Meal>> {
        let row = self
            .conn
            .query_row(
                &format!("{MEAL_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
                [name],
                read_meal_row,
            )
            .optional()?;
        row.map(checked_meal).transpose()
    }

    fn list_meals(&self) -> RepoResult<Vec<Meal>> {
        self.query_meals(&format!("{MEAL_SELECT_SQL} ORDER BY id ASC;"), None)
    }

    fn list_meals_for_user(&self, user_id: UserId) -> RepoResult<Vec<Meal>> {
        self.query_meals(
            &format!("{MEAL_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"),
            Some(user_id),
        )
    }

    fn count_meals(&self) -> RepoResult<u64> {
        count_rows(self.conn, "meals")
    }

    fn update_meal(&self, meal: &Meal) -> RepoResult<()> {
        meal.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE meals
                 SET
                    user_id = ?2,
                    name = ?3,
                    description = ?4
                 WHERE id = ?1;",
                params![
                    meal.id,
                    meal.user_id,
                    meal.name.as_str(),
                    meal.description.as_deref(),
                ],
            )
            .map_err(|err| map_owner_violation(err, meal.user_id))?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Meal(meal.id)));
        }
        Ok(())
    }

    fn delete_meal(&self, id: MealId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM meals WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Meal(id)));
        }
        Ok(())
    }
}

fn read_meal_row(row: &Row<'_>) -> rusqlite::Result<Meal> {
    Ok(Meal {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn checked_meal(meal: Meal) -> RepoResult<Meal> {
    meal.validate()
        .map_err(|err| RepoError::InvalidData(format!("meals row {}: {err}", meal.id)))?;
    Ok(meal)
}

fn map_owner_violation(err: rusqlite::Error, user_id: UserId) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::ForeignKey) => RepoError::ReferentialIntegrity(EntityRef::User(user_id)),
        _ => err.into(),
    }
}
