//! Transaction error types.

use spendful_shared::types::TransactionId;
use spendful_shared::{AppError, FieldErrors};
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while recording or changing a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// The transaction failed validation; nothing was written.
    #[error("Transaction is invalid: {0}")]
    Invalid(FieldErrors),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransactionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Invalid(_) => "TRANSACTION_INVALID",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(id) => Self::NotFound(format!("transaction {id}")),
            TransactionError::Invalid(errors) => Self::Validation(errors),
            TransactionError::Store(err) => err.into(),
        }
    }
}
