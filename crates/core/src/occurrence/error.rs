//! Occurrence error types.

use spendful_shared::AppError;
use spendful_shared::types::ItemId;
use thiserror::Error;

use crate::item::ItemError;
use crate::store::StoreError;

/// Errors that abort an occurrence edit or deletion.
///
/// Field-level rejections are not errors: they are collected on the
/// occurrence and reported through a `false` result from `save`.
#[derive(Debug, Error)]
pub enum OccurrenceError {
    /// The occurrence's item no longer exists.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Saving or deleting the item failed.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OccurrenceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::Item(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<OccurrenceError> for AppError {
    fn from(err: OccurrenceError) -> Self {
        match err {
            OccurrenceError::ItemNotFound(id) => Self::NotFound(format!("item {id}")),
            OccurrenceError::Item(err) => err.into(),
            OccurrenceError::Store(err) => err.into(),
        }
    }
}
