//! Unit of work over one SQLite transaction.
//!
//! # Responsibility
//! - Run grouped create/update/delete calls inside one `BEGIN IMMEDIATE`
//!   transaction so they become durable together.
//! - Refuse to commit once any write in the unit has failed.
//!
//! # Invariants
//! - Writes see earlier writes of the same unit; other connections do not
//!   until commit.
//! - A failed write poisons the unit: `commit` rolls everything back and
//!   returns `RepoError::UnitAborted`.
//! - Dropping a unit without `commit` rolls back.

use crate::model::ingredient::{Ingredient, IngredientId, NewIngredient};
use crate::model::meal::{Meal, MealId, NewMeal};
use crate::model::meal_ingredient::{MealIngredient, MealIngredientEntry};
use crate::model::user::{NewUser, User, UserId};
use crate::repo::ingredient_repo::{IngredientRepository, SqliteIngredientRepository};
use crate::repo::meal_ingredient_repo::{MealIngredientRepository, SqliteMealIngredientRepository};
use crate::repo::meal_repo::{MealRepository, SqliteMealRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::Cell;
use std::time::Instant;

/// Group of writes committed or rolled back as one.
pub struct UnitOfWork<'store> {
    tx: Transaction<'store>,
    writes: Cell<u32>,
    failed_writes: Cell<u32>,
    started_at: Instant,
}

impl<'store> UnitOfWork<'store> {
    pub(crate) fn begin(conn: &'store mut Connection) -> RepoResult<Self> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        debug!("event=uow_begin module=store status=ok");
        Ok(Self {
            tx,
            writes: Cell::new(0),
            failed_writes: Cell::new(0),
            started_at: Instant::now(),
        })
    }

    /// Returns whether a write in this unit has failed.
    pub fn is_poisoned(&self) -> bool {
        self.failed_writes.get() > 0
    }

    /// Makes every write of this unit durable, or none of them.
    ///
    /// # Errors
    /// - `RepoError::UnitAborted` when an earlier write failed; the unit is
    ///   rolled back.
    /// - `RepoError::Db` when SQLite rejects the commit; the unit is rolled back.
    pub fn commit(self) -> RepoResult<()> {
        let writes = self.writes.get();
        let failed_writes = self.failed_writes.get();
        let duration_ms = self.started_at.elapsed().as_millis();

        if failed_writes > 0 {
            self.tx.rollback()?;
            warn!(
                "event=uow_rollback module=store status=aborted writes={writes} failed_writes={failed_writes} duration_ms={duration_ms}"
            );
            return Err(RepoError::UnitAborted);
        }

        match self.tx.commit() {
            Ok(()) => {
                debug!(
                    "event=uow_commit module=store status=ok writes={writes} duration_ms={duration_ms}"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=uow_commit module=store status=error writes={writes} duration_ms={duration_ms} error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Discards every write of this unit.
    pub fn rollback(self) -> RepoResult<()> {
        let writes = self.writes.get();
        self.tx.rollback()?;
        debug!("event=uow_rollback module=store status=ok writes={writes}");
        Ok(())
    }

    fn track<T>(&self, result: RepoResult<T>) -> RepoResult<T> {
        self.writes.set(self.writes.get() + 1);
        if result.is_err() {
            self.failed_writes.set(self.failed_writes.get() + 1);
        }
        result
    }

    fn users(&self) -> SqliteUserRepository<'_> {
        SqliteUserRepository::new(&self.tx)
    }

    fn meals(&self) -> SqliteMealRepository<'_> {
        SqliteMealRepository::new(&self.tx)
    }

    fn ingredients(&self) -> SqliteIngredientRepository<'_> {
        SqliteIngredientRepository::new(&self.tx)
    }

    fn links(&self) -> SqliteMealIngredientRepository<'_> {
        SqliteMealIngredientRepository::new(&self.tx)
    }
}

impl UserRepository for UnitOfWork<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        self.track(self.users().create_user(user))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.users().get_user(id)
    }

    fn find_user_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        self.users().find_user_by_name(name)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        self.users().list_users()
    }

    fn count_users(&self) -> RepoResult<u64> {
        self.users().count_users()
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        self.track(self.users().update_user(user))
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        self.track(self.users().delete_user(id))
    }
}

impl MealRepository for UnitOfWork<'_> {
    fn create_meal(&self, meal: &NewMeal) -> RepoResult<Meal> {
        self.track(self.meals().create_meal(meal))
    }

    fn get_meal(&self, id: MealId) -> RepoResult<Option<Meal>> {
        self.meals().get_meal(id)
    }

    fn find_meal_by_name(&self, name: &str) -> RepoResult<Option<Meal>> {
        self.meals().find_meal_by_name(name)
    }

    fn list_meals(&self) -> RepoResult<Vec<Meal>> {
        self.meals().list_meals()
    }

    fn list_meals_for_user(&self, user_id: UserId) -> RepoResult<Vec<Meal>> {
        self.meals().list_meals_for_user(user_id)
    }

    fn count_meals(&self) -> RepoResult<u64> {
        self.meals().count_meals()
    }

    fn update_meal(&self, meal: &Meal) -> RepoResult<()> {
        self.track(self.meals().update_meal(meal))
    }

    fn delete_meal(&self, id: MealId) -> RepoResult<()> {
        self.track(self.meals().delete_meal(id))
    }
}

impl IngredientRepository for UnitOfWork<'_> {
    fn create_ingredient(&self, ingredient: &NewIngredient) -> RepoResult<Ingredient> {
        self.track(self.ingredients().create_ingredient(ingredient))
    }

    fn get_ingredient(&self, id: IngredientId) -> RepoResult<Option<Ingredient>> {
        self.ingredients().get_ingredient(id)
    }

    fn find_ingredient_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>> {
        self.ingredients().find_ingredient_by_name(name)
    }

    fn list_ingredients(&self) -> RepoResult<Vec<Ingredient>> {
        self.ingredients().list_ingredients()
    }

    fn count_ingredients(&self) -> RepoResult<u64> {
        self.ingredients().count_ingredients()
    }

    fn update_ingredient(&self, ingredient: &Ingredient) -> RepoResult<()> {
        self.track(self.ingredients().update_ingredient(ingredient))
    }

    fn delete_ingredient(&self, id: IngredientId) -> RepoResult<()> {
        self.track(self.ingredients().delete_ingredient(id))
    }
}

impl MealIngredientRepository for UnitOfWork<'_> {
    fn link_ingredient(&self, link: &MealIngredient) -> RepoResult<()> {
        self.track(self.links().link_ingredient(link))
    }

    fn get_meal_ingredient(
        &self,
        meal_id: MealId,
        ingredient_id: IngredientId,
    ) -> RepoResult<Option<MealIngredient>> {
        self.links().get_meal_ingredient(meal_id, ingredient_id)
    }

    fn list_meal_ingredients(&self, meal_id: MealId) -> RepoResult<Vec<MealIngredientEntry>> {
        self.links().list_meal_ingredients(meal_id)
    }

    fn count_meal_ingredients(&self) -> RepoResult<u64> {
        self.links().count_meal_ingredients()
    }

    fn update_meal_ingredient(&self, link: &MealIngredient) -> RepoResult<()> {
        self.track(self.links().update_meal_ingredient(link))
    }

    fn unlink_ingredient(&self, meal_id: MealId, ingredient_id: IngredientId) -> RepoResult<()> {
        self.track(self.links().unlink_ingredient(meal_id, ingredient_id))
    }
}
