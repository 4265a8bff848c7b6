//! Persistence collaborator.
//!
//! The engine reads and writes budgets, items and transactions only through
//! the [`Store`] trait. Multi-record edits run inside [`atomically`], which
//! commits on success and rolls every write back on failure.

pub mod error;
pub mod memory;
pub mod query;
pub mod snapshot;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::{ItemQuery, KindFilter, TransactionQuery};
pub use snapshot::Snapshot;

use spendful_shared::types::{BudgetId, ItemId, TransactionId};

use crate::budget::Budget;
use crate::item::RecurringItem;
use crate::transaction::Transaction;

/// CRUD, predicate queries and nestable atomic transactions.
///
/// Query results are ordered: items by (starts_on, name), transactions by (date, id).
pub trait Store {
    /// Looks up a budget.
    fn budget(&self, id: BudgetId) -> Result<Option<Budget>, StoreError>;
    /// Inserts or replaces a budget.
    fn save_budget(&mut self, budget: &Budget) -> Result<(), StoreError>;

    /// Looks up an item.
    fn item(&self, id: ItemId) -> Result<Option<RecurringItem>, StoreError>;
    /// Items matching `query`.
    fn items(&self, query: &ItemQuery) -> Result<Vec<RecurringItem>, StoreError>;
    /// Inserts a new item.
    fn insert_item(&mut self, item: &RecurringItem) -> Result<(), StoreError>;
    /// Replaces an existing item.
    fn update_item(&mut self, item: &RecurringItem) -> Result<(), StoreError>;
    /// Deletes an item.
    fn delete_item(&mut self, id: ItemId) -> Result<(), StoreError>;

    /// Looks up a transaction.
    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;
    /// Transactions matching `query`.
    fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, StoreError>;
    /// Inserts a new transaction.
    fn insert_transaction(&mut self, txn: &Transaction) -> Result<(), StoreError>;
    /// Replaces an existing transaction.
    fn update_transaction(&mut self, txn: &Transaction) -> Result<(), StoreError>;
    /// Deletes a transaction.
    fn delete_transaction(&mut self, id: TransactionId) -> Result<(), StoreError>;

    /// Opens a (possibly nested) transaction.
    fn begin(&mut self) -> Result<(), StoreError>;
    /// Makes the writes of the innermost transaction permanent.
    fn commit(&mut self) -> Result<(), StoreError>;
    /// Discards the writes of the innermost transaction.
    fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Runs `f` inside a store transaction: commits on `Ok`, rolls back on `Err`.
///
/// # Errors
///
/// Returns the error produced by `f`, or a store error from begin/commit.
pub fn atomically<S, T, E, F>(store: &mut S, f: F) -> Result<T, E>
where
    S: Store + ?Sized,
    E: From<StoreError>,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    store.begin()?;
    match f(store) {
        Ok(value) => {
            store.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback() {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
