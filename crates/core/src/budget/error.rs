//! Budget error types.

use spendful_shared::types::BudgetId;
use spendful_shared::{AppError, FieldErrors};
use thiserror::Error;

use crate::store::StoreError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget failed validation.
    #[error("Budget is invalid: {0}")]
    Invalid(FieldErrors),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::Invalid(_) => "BUDGET_INVALID",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(id) => Self::NotFound(format!("budget {id}")),
            BudgetError::Invalid(errors) => Self::Validation(errors),
            BudgetError::Store(err) => err.into(),
        }
    }
}
