//! Database error types.

use derive_more::{Display, Error};

/// Database error with caller location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
    /// Set when the failure was a unique-constraint violation, so callers
    /// can map duplicate turn writes to a conflict.
    pub unique_violation: bool,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
            unique_violation: false,
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        let unique_violation = matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )
        );
        let mut db_err = Self::new(format!("diesel error: {}", err));
        db_err.unique_violation = unique_violation;
        db_err
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("connection error: {}", err))
    }
}
