//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Translate storage constraint failures into semantic errors.
//!
//! # Invariants
//! - Write paths validate their input before any SQL runs.
//! - Uniqueness and referential integrity are enforced by the schema; the
//!   repositories only classify the resulting failures.
//! - Reads report absence as `Ok(None)`; writes targeting an absent row fail
//!   with `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::ingredient::IngredientId;
use crate::model::meal::MealId;
use crate::model::validation::ValidationError;
use crate::model::EntityRef;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ingredient_repo;
pub mod meal_ingredient_repo;
pub mod meal_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// All four entity contracts over one storage handle.
pub trait TrackerRepository:
    user_repo::UserRepository
    + meal_repo::MealRepository
    + ingredient_repo::IngredientRepository
    + meal_ingredient_repo::MealIngredientRepository
{
}

impl<T> TrackerRepository for T where
    T: user_repo::UserRepository
        + meal_repo::MealRepository
        + ingredient_repo::IngredientRepository
        + meal_ingredient_repo::MealIngredientRepository
{
}

/// Error for tracker persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed field validation; nothing was written.
    Validation(ValidationError),
    /// A unique column already holds this value.
    Uniqueness { field: &'static str, value: String },
    /// A foreign key points at a row that does not exist.
    ReferentialIntegrity(EntityRef),
    /// The meal/ingredient pair is already linked.
    DuplicateKey {
        meal_id: MealId,
        ingredient_id: IngredientId,
    },
    /// The targeted row does not exist.
    NotFound(EntityRef),
    /// Commit refused because an earlier write in the unit failed.
    UnitAborted,
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Uniqueness { field, value } => {
                write!(f, "`{field}` must be unique; `{value}` already exists")
            }
            Self::ReferentialIntegrity(target) => {
                write!(f, "referenced {target} does not exist")
            }
            Self::DuplicateKey {
                meal_id,
                ingredient_id,
            } => write!(
                f,
                "ingredient {ingredient_id} is already linked to meal {meal_id}"
            ),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::UnitAborted => write!(
                f,
                "unit of work rolled back because an earlier write failed"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint families the repositories translate into semantic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
}

/// Classifies a SQLite failure by its extended result code.
pub(crate) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }

    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE => Some(ConstraintKind::Unique),
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(ConstraintKind::PrimaryKey),
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}

/// `table` is always a crate-internal literal.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count {count} for {table}")))
}
