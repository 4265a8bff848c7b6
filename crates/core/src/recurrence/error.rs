//! Recurrence error types.

use thiserror::Error;

/// Errors raised while enumerating a recurrence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// Unbounded enumeration was requested on a series with no end date.
    #[error("Item must have an ending date to access all occurrences. Use until or limit instead.")]
    NoEndDate,
}

impl RecurrenceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoEndDate => "NO_END_DATE",
        }
    }
}

impl From<RecurrenceError> for spendful_shared::AppError {
    fn from(err: RecurrenceError) -> Self {
        match err {
            RecurrenceError::NoEndDate => Self::NoEndDate,
        }
    }
}
