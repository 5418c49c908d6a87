//! Storage context: one owned connection plus unit-of-work entry points.
//!
//! # Responsibility
//! - Own the SQLite connection for its whole lifetime and release it on drop.
//! - Hand out units of work for grouped writes.
//! - Hand out connection-bound repositories for standalone reads.
//!
//! # Invariants
//! - A store is only constructed from a migrated connection.
//! - At most one unit of work is open per store (enforced by `&mut self`).
//! - Repositories returned by the accessors run outside any unit of work;
//!   each write made through them commits on its own.

use crate::db::migrations::current_version;
use crate::db::{open_db, DbConfig, DbResult};
use crate::repo::ingredient_repo::SqliteIngredientRepository;
use crate::repo::meal_ingredient_repo::SqliteMealIngredientRepository;
use crate::repo::meal_repo::SqliteMealRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::repo::RepoResult;
use log::{error, info};
use rusqlite::Connection;

mod unit_of_work;

pub use unit_of_work::UnitOfWork;

/// Explicit storage context passed to every data-access call.
pub struct Store {
    conn: Connection,
    mode: &'static str,
}

impl Store {
    /// Opens (and migrates) the configured database.
    pub fn open(config: &DbConfig) -> DbResult<Self> {
        let conn = open_db(config)?;
        Ok(Self {
            conn,
            mode: config.location.mode(),
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&DbConfig::in_memory())
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> DbResult<u32> {
        current_version(&self.conn)
    }

    /// Starts a unit of work; dropping it without `commit` rolls back.
    pub fn begin(&mut self) -> RepoResult<UnitOfWork<'_>> {
        UnitOfWork::begin(&mut self.conn)
    }

    pub fn users(&self) -> SqliteUserRepository<'_> {
        SqliteUserRepository::new(&self.conn)
    }

    pub fn meals(&self) -> SqliteMealRepository<'_> {
        SqliteMealRepository::new(&self.conn)
    }

    pub fn ingredients(&self) -> SqliteIngredientRepository<'_> {
        SqliteIngredientRepository::new(&self.conn)
    }

    pub fn meal_ingredients(&self) -> SqliteMealIngredientRepository<'_> {
        SqliteMealIngredientRepository::new(&self.conn)
    }

    /// Closes the connection and reports close failures.
    ///
    /// Dropping a store also closes it, but silently.
    pub fn close(self) -> DbResult<()> {
        let mode = self.mode;
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=store_close module=store status=error mode={mode} error={}",
                    err
                );
                Err(err.into())
            }
        }
    }
}
