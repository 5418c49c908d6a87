//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `users.name` uniqueness is enforced by the schema and surfaces as
//!   `RepoError::Uniqueness`.
//! - Deleting a user cascades to its meals and their ingredient links.

use super::{constraint_kind, count_rows, ConstraintKind, RepoError, RepoResult};
use crate::model::user::{NewUser, User, UserId};
use crate::model::EntityRef;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, name FROM users";

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns the first user with exactly this name.
    fn find_user_by_name(&self, name: &str) -> RepoResult<Option<User>>;
    /// Lists all users in insertion order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn count_users(&self) -> RepoResult<u64>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        self.conn
            .execute("INSERT INTO users (name) VALUES (?1);", [user.name.as_str()])
            .map_err(|err| map_name_conflict(err, &user.name))?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: user.name.clone(),
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_user_row,
            )
            .optional()?;
        row.map(checked_user).transpose()
    }

    fn find_user_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
                [name],
                read_user_row,
            )
            .optional()?;
        row.map(checked_user).transpose()
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(checked_user(read_user_row(row)?)?);
        }
        Ok(users)
    }

    fn count_users(&self) -> RepoResult<u64> {
        count_rows(self.conn, "users")
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE users SET name = ?2 WHERE id = ?1;",
                params![user.id, user.name.as_str()],
            )
            .map_err(|err| map_name_conflict(err, &user.name))?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::User(user.id)));
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::User(id)));
        }
        Ok(())
    }
}

fn read_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn checked_user(user: User) -> RepoResult<User> {
    user.validate()
        .map_err(|err| RepoError::InvalidData(format!("users row {}: {err}", user.id)))?;
    Ok(user)
}

fn map_name_conflict(err: rusqlite::Error, name: &str) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::Unique) => RepoError::Uniqueness {
            field: "users.name",
            value: name.to_string(),
        },
        _ => err.into(),
    }
}
