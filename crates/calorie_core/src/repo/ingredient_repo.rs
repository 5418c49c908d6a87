//! Ingredient repository contract and SQLite implementation.
//!
//! # Invariants
//! - Ingredients carry no cross-entity constraint on write.
//! - Deleting an ingredient cascades to every meal link referencing it.

use super::{count_rows, RepoError, RepoResult};
use crate::model::ingredient::{Ingredient, IngredientId, NewIngredient};
use crate::model::EntityRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INGREDIENT_SELECT_SQL: &str =
    "SELECT id, name, ssize, kcal, carbs, proteins, fats FROM ingredients";

/// Repository interface for ingredient CRUD operations.
pub trait IngredientRepository {
    fn create_ingredient(&self, ingredient: &NewIngredient) -> RepoResult<Ingredient>;
    fn get_ingredient(&self, id: IngredientId) -> RepoResult<Option<Ingredient>>;
    /// Returns the earliest inserted ingredient with exactly this name.
    fn find_ingredient_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>>;
    /// Lists all ingredients in insertion order.
    fn list_ingredients(&self) -> RepoResult<Vec<Ingredient>>;
    fn count_ingredients(&self) -> RepoResult<u64>;
    fn update_ingredient(&self, ingredient: &Ingredient) -> RepoResult<()>;
    fn delete_ingredient(&self, id: IngredientId) -> RepoResult<()>;
}

/// SQLite-backed ingredient repository.
pub struct SqliteIngredientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIngredientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl IngredientRepository for SqliteIngredientRepository<'_> {
    fn create_ingredient(&self, ingredient: &NewIngredient) -> RepoResult<Ingredient> {
        ingredient.validate()?;

        self.conn.execute(
            "INSERT INTO ingredients (
                name,
                ssize,
                kcal,
                carbs,
                proteins,
                fats
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                ingredient.name.as_str(),
                ingredient.reference_size,
                ingredient.kcal,
                ingredient.carbs,
                ingredient.proteins,
                ingredient.fats,
            ],
        )?;

        Ok(Ingredient {
            id: self.conn.last_insert_rowid(),
            name: ingredient.name.clone(),
            reference_size: ingredient.reference_size,
            kcal: ingredient.kcal,
            carbs: ingredient.carbs,
            proteins: ingredient.proteins,
            fats: ingredient.fats,
        })
    }

    fn get_ingredient(&self, id: IngredientId) -> RepoResult<Option<Ingredient>> {
        let row = self
            .conn
            .query_row(
                &format!("{INGREDIENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_ingredient_row,
            )
            .optional()?;
        row.map(checked_ingredient).transpose()
    }

    fn find_ingredient_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>> {
        let row = self
            .conn
            .query_row(
                &format!("{INGREDIENT_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
                [name],
                read_ingredient_row,
            )
            .optional()?;
        row.map(checked_ingredient).transpose()
    }

    fn list_ingredients(&self) -> RepoResult<Vec<Ingredient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INGREDIENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut ingredients = Vec::new();
        while let Some(row) = rows.next()? {
            ingredients.push(checked_ingredient(read_ingredient_row(row)?)?);
        }
        Ok(ingredients)
    }

    fn count_ingredients(&self) -> RepoResult<u64> {
        count_rows(self.conn, "ingredients")
    }

    fn update_ingredient(&self, ingredient: &Ingredient) -> RepoResult<()> {
        ingredient.validate()?;

        let changed = self.conn.execute(
            "UPDATE ingredients
             SET
                name = ?2,
                ssize = ?3,
                kcal = ?4,
                carbs = ?5,
                proteins = ?6,
                fats = ?7
             WHERE id = ?1;",
            params![
                ingredient.id,
                ingredient.name.as_str(),
                ingredient.reference_size,
                ingredient.kcal,
                ingredient.carbs,
                ingredient.proteins,
                ingredient.fats,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Ingredient(ingredient.id)));
        }
        Ok(())
    }

    fn delete_ingredient(&self, id: IngredientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM ingredients WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Ingredient(id)));
        }
        Ok(())
    }
}

/// Reads ingredient columns by name, so joined queries can reuse it with aliases.
pub(crate) fn read_ingredient_row(row: &Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get("id")?,
        name: row.get("name")?,
        reference_size: row.get("ssize")?,
        kcal: row.get("kcal")?,
        carbs: row.get("carbs")?,
        proteins: row.get("proteins")?,
        fats: row.get("fats")?,
    })
}

pub(crate) fn checked_ingredient(ingredient: Ingredient) -> RepoResult<Ingredient> {
    ingredient.validate().map_err(|err| {
        RepoError::InvalidData(format!("ingredients row {}: {err}", ingredient.id))
    })?;
    Ok(ingredient)
}
