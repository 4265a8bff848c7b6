//! Persistence error types.

use spendful_shared::AppError;
use thiserror::Error;

/// Errors reported by a [`Store`](super::Store) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record to update or delete does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// A record with the same identifier already exists.
    #[error("{entity} already exists: {id}")]
    Duplicate {
        /// Kind of record.
        entity: &'static str,
        /// Conflicting identifier.
        id: String,
    },

    /// `commit` or `rollback` was called outside a transaction.
    #[error("No active transaction")]
    NoActiveTransaction,

    /// The backend refused or failed the operation.
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Shorthand for [`StoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RECORD_NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE_RECORD",
            Self::NoActiveTransaction => "NO_ACTIVE_TRANSACTION",
            Self::Backend(_) => "STORAGE_BACKEND_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            other => Self::Persistence(other.to_string()),
        }
    }
}
