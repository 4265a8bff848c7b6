//! Recurring item error types.

use spendful_shared::types::ItemId;
use spendful_shared::{AppError, FieldErrors};
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while saving or deleting an item.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Item not found.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// The item failed validation; nothing was written.
    #[error("Item is invalid: {0}")]
    Invalid(FieldErrors),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ItemError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ITEM_NOT_FOUND",
            Self::Invalid(_) => "ITEM_INVALID",
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => Self::NotFound(format!("item {id}")),
            ItemError::Invalid(errors) => Self::Validation(errors),
            ItemError::Store(err) => err.into(),
        }
    }
}
