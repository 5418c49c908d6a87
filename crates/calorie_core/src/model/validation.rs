//! Field-level validation shared by all entity models.
//!
//! Text limits are counted in characters, matching SQLite `length()` on TEXT.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty or whitespace-only.
    Required { field: &'static str },
    /// Text exceeds the column's character cap.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Quantity is NaN or infinite. SQLite would store NaN as NULL.
    NotFinite { field: &'static str },
    /// Quantity is below zero.
    Negative { field: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { field } => write!(f, "`{field}` is required"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` must be at most {max_chars} characters, got {actual_chars}"
            ),
            Self::NotFinite { field } => write!(f, "`{field}` must be a finite number"),
            Self::Negative { field } => write!(f, "`{field}` must not be negative"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_required_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    validate_text_length(field, value, max_chars)
}

pub(crate) fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => validate_text_length(field, value, max_chars),
        None => Ok(()),
    }
}

pub(crate) fn validate_quantity(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

pub(crate) fn validate_optional_quantity(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => validate_quantity(field, value),
        None => Ok(()),
    }
}

fn validate_text_length(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
