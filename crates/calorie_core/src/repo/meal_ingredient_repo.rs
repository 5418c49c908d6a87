//! Meal/ingredient link repository contract and SQLite implementation.
//!
//! # Invariants
//! - Both ends of a link must exist; a missing end surfaces as
//!   `RepoError::ReferentialIntegrity` naming that end.
//! - A `(meal_id, ingredient_id)` pair is stored at most once.
//! - Links are listed in insertion order.

use super::ingredient_repo::{checked_ingredient, read_ingredient_row};
use super::{constraint_kind, count_rows, row_exists, ConstraintKind, RepoError, RepoResult};
use crate::model::ingredient::IngredientId;
use crate::model::meal::MealId;
use crate::model::meal_ingredient::{MealIngredient, MealIngredientEntry};
use crate::model::EntityRef;
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for the meal/ingredient association.
pub trait MealIngredientRepository {
    /// Links an ingredient to a meal with the quantity used.
    fn link_ingredient(&self, link: &MealIngredient) -> RepoResult<()>;
    fn get_meal_ingredient(
        &self,
        meal_id: MealId,
        ingredient_id: IngredientId,
    ) -> RepoResult<Option<MealIngredient>>;
    /// Lists a meal's ingredient lines joined with their ingredient rows.
    fn list_meal_ingredients(&self, meal_id: MealId) -> RepoResult<Vec<MealIngredientEntry>>;
    fn count_meal_ingredients(&self) -> RepoResult<u64>;
    /// Changes the used size of an existing link.
    fn update_meal_ingredient(&self, link: &MealIngredient) -> RepoResult<()>;
    fn unlink_ingredient(&self, meal_id: MealId, ingredient_id: IngredientId) -> RepoResult<()>;
}

/// SQLite-backed link repository.
pub struct SqliteMealIngredientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMealIngredientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn missing_link_end(&self, meal_id: MealId, ingredient_id: IngredientId) -> RepoResult<EntityRef> {
        if !row_exists(self.conn, "meals", meal_id)? {
            return Ok(EntityRef::Meal(meal_id));
        }
        Ok(EntityRef::Ingredient(ingredient_id))
    }
}

impl MealIngredientRepository for SqliteMealIngredientRepository<'_> {
    fn link_ingredient(&self, link: &MealIngredient) -> RepoResult<()> {
        link.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO ingredients_in_meal (meal_id, ingredient_id, ssize)
             VALUES (?1, ?2, ?3);",
            params![link.meal_id, link.ingredient_id, link.used_size],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) => match constraint_kind(&err) {
                Some(ConstraintKind::PrimaryKey | ConstraintKind::Unique) => {
                    Err(RepoError::DuplicateKey {
                        meal_id: link.meal_id,
                        ingredient_id: link.ingredient_id,
                    })
                }
                Some(ConstraintKind::ForeignKey) => Err(RepoError::ReferentialIntegrity(
                    self.missing_link_end(link.meal_id, link.ingredient_id)?,
                )),
                None => Err(err.into()),
            },
        }
    }

    fn get_meal_ingredient(
        &self,
        meal_id: MealId,
        ingredient_id: IngredientId,
    ) -> RepoResult<Option<MealIngredient>> {
        let link = self
            .conn
            .query_row(
                "SELECT meal_id, ingredient_id, ssize
                 FROM ingredients_in_meal
                 WHERE meal_id = ?1
                   AND ingredient_id = ?2;",
                params![meal_id, ingredient_id],
                |row| {
                    Ok(MealIngredient {
                        meal_id: row.get("meal_id")?,
                        ingredient_id: row.get("ingredient_id")?,
                        used_size: row.get("ssize")?,
                    })
                },
            )
            .optional()?;
        Ok(link)
    }

    fn list_meal_ingredients(&self, meal_id: MealId) -> RepoResult<Vec<MealIngredientEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                i.id AS id,
                i.name AS name,
                i.ssize AS ssize,
                i.kcal AS kcal,
                i.carbs AS carbs,
                i.proteins AS proteins,
                i.fats AS fats,
                l.ssize AS used_size
             FROM ingredients_in_meal l
             INNER JOIN ingredients i ON i.id = l.ingredient_id
             WHERE l.meal_id = ?1
             ORDER BY l.rowid ASC;",
        )?;
        let mut rows = stmt.query([meal_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(MealIngredientEntry {
                ingredient: checked_ingredient(read_ingredient_row(row)?)?,
                used_size: row.get("used_size")?,
            });
        }
        Ok(entries)
    }

    fn count_meal_ingredients(&self) -> RepoResult<u64> {
        count_rows(self.conn, "ingredients_in_meal")
    }

    fn update_meal_ingredient(&self, link: &MealIngredient) -> RepoResult<()> {
        link.validate()?;

        let changed = self.conn.execute(
            "UPDATE ingredients_in_meal
             SET ssize = ?3
             WHERE meal_id = ?1
               AND ingredient_id = ?2;",
            params![link.meal_id, link.ingredient_id, link.used_size],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::MealIngredient {
                meal_id: link.meal_id,
                ingredient_id: link.ingredient_id,
            }));
        }
        Ok(())
    }

    fn unlink_ingredient(&self, meal_id: MealId, ingredient_id: IngredientId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM ingredients_in_meal
             WHERE meal_id = ?1
               AND ingredient_id = ?2;",
            params![meal_id, ingredient_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::MealIngredient {
                meal_id,
                ingredient_id,
            }));
        }
        Ok(())
    }
}
