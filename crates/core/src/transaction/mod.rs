//! Recorded transactions and their links to item occurrences.

pub mod error;
pub mod service;
pub mod types;

pub use error::TransactionError;
pub use service::TransactionService;
pub use types::{NO_DESCRIPTION, NewTransaction, Transaction, TransactionKind};
