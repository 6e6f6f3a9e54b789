//! Application error types
//!
//! Errors surfaced to the invoking command. Storage failures are wrapped from
//! [`DbError`].

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Entry {0} not found")]
    EntryNotFound(i64),

    #[error("No meal plan for {user} starting {start}")]
    PlanNotFound { user: String, start: NaiveDate },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Daily calorie goal is 0; cannot compute percentage of goal")]
    ZeroTarget,

    #[error("Calorie total is too large to compute")]
    CalorieOverflow,

    #[error(transparent)]
    Store(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for command operations
pub type AppResult<T> = Result<T, AppError>;
