//! User domain model.
//!
//! # Invariants
//! - `name` is required, at most 16 characters, and unique across users.
//!   Uniqueness is enforced by storage, not here.

use super::validation::{validate_required_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

pub const USER_NAME_MAX_CHARS: usize = 16;

/// Persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    /// Checks field constraints before an update is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_user_name(&self.name)
    }
}

/// Input for creating a user; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_user_name(&self.name)
    }
}

pub fn validate_user_name(name: &str) -> Result<(), ValidationError> {
    validate_required_text("user.name", name, USER_NAME_MAX_CHARS)
}
