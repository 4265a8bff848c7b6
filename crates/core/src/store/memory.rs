//! In-process [`Store`] backed by ordered maps.

use std::collections::BTreeMap;

use spendful_shared::types::{BudgetId, ItemId, TransactionId};

use super::{ItemQuery, Snapshot, Store, StoreError, TransactionQuery};
use crate::budget::Budget;
use crate::item::RecurringItem;
use crate::transaction::Transaction;

#[derive(Debug, Clone, Default)]
struct Tables {
    budgets: BTreeMap<BudgetId, Budget>,
    items: BTreeMap<ItemId, RecurringItem>,
    transactions: BTreeMap<TransactionId, Transaction>,
}

/// A [`Store`] held entirely in memory.
///
/// Each `begin` pushes a copy of the tables; `rollback` restores it and
/// `commit` discards it, so nested transactions unwind exactly.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
    savepoints: Vec<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every record of `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Tables::default();
        tables.budgets.extend(snapshot.budgets.into_iter().map(|b| (b.id, b)));
        tables.items.extend(snapshot.items.into_iter().map(|i| (i.id, i)));
        tables
            .transactions
            .extend(snapshot.transactions.into_iter().map(|t| (t.id, t)));
        Self {
            tables,
            savepoints: Vec::new(),
        }
    }

    /// Copies the committed-so-far state into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            budgets: self.tables.budgets.values().cloned().collect(),
            items: self.tables.items.values().cloned().collect(),
            transactions: self.tables.transactions.values().cloned().collect(),
        }
    }

    /// Depth of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.savepoints.len()
    }

    /// Number of stored items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.tables.items.len()
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.tables.transactions.len()
    }
}

impl Store for MemoryStore {
    fn budget(&self, id: BudgetId) -> Result<Option<Budget>, StoreError> {
        Ok(self.tables.budgets.get(&id).cloned())
    }

    fn save_budget(&mut self, budget: &Budget) -> Result<(), StoreError> {
        self.tables.budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    fn item(&self, id: ItemId) -> Result<Option<RecurringItem>, StoreError> {
        Ok(self.tables.items.get(&id).cloned())
    }

    fn items(&self, query: &ItemQuery) -> Result<Vec<RecurringItem>, StoreError> {
        let mut items: Vec<RecurringItem> = self
            .tables
            .items
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.starts_on, &a.name).cmp(&(b.starts_on, &b.name)));
        Ok(items)
    }

    fn insert_item(&mut self, item: &RecurringItem) -> Result<(), StoreError> {
        if self.tables.items.contains_key(&item.id) {
            return Err(StoreError::Duplicate {
                entity: "item",
                id: item.id.to_string(),
            });
        }
        self.tables.items.insert(item.id, item.clone());
        Ok(())
    }

    fn update_item(&mut self, item: &RecurringItem) -> Result<(), StoreError> {
        let slot = self
            .tables
            .items
            .get_mut(&item.id)
            .ok_or_else(|| StoreError::not_found("item", item.id))?;
        *slot = item.clone();
        Ok(())
    }

    fn delete_item(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.tables
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("item", id))
    }

    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.tables.transactions.get(&id).cloned())
    }

    fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, StoreError> {
        let mut txns: Vec<Transaction> = self
            .tables
            .transactions
            .values()
            .filter(|txn| query.matches(txn))
            .cloned()
            .collect();
        txns.sort_by_key(|txn| (txn.date, txn.id));
        Ok(txns)
    }

    fn insert_transaction(&mut self, txn: &Transaction) -> Result<(), StoreError> {
        if self.tables.transactions.contains_key(&txn.id) {
            return Err(StoreError::Duplicate {
                entity: "transaction",
                id: txn.id.to_string(),
            });
        }
        self.tables.transactions.insert(txn.id, txn.clone());
        Ok(())
    }

    fn update_transaction(&mut self, txn: &Transaction) -> Result<(), StoreError> {
        let slot = self
            .tables
            .transactions
            .get_mut(&txn.id)
            .ok_or_else(|| StoreError::not_found("transaction", txn.id))?;
        *slot = txn.clone();
        Ok(())
    }

    fn delete_transaction(&mut self, id: TransactionId) -> Result<(), StoreError> {
        self.tables
            .transactions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("transaction", id))
    }

    fn begin(&mut self) -> Result<(), StoreError> {
        self.savepoints.push(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.savepoints
            .pop()
            .map(|_| ())
            .ok_or(StoreError::NoActiveTransaction)
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        let saved = self.savepoints.pop().ok_or(StoreError::NoActiveTransaction)?;
        self.tables = saved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Category, NewItem};
    use crate::recurrence::Schedule;
    use crate::store::atomically;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(budget_id: BudgetId, name: &str) -> RecurringItem {
        NewItem {
            budget_id,
            category: Category::Expense,
            name: name.into(),
            amount: 100,
            schedule: Some(Schedule::Weekly),
            starts_on: ymd(2024, 1, 1),
            ends_on: None,
        }
        .into_item()
    }

    #[test]
    fn test_crud_round_trip() {
        let mut store = MemoryStore::new();
        let budget = Budget::new("Home", 0, ymd(2024, 1, 1));
        store.save_budget(&budget).unwrap();

        let mut rent = item(budget.id, "Rent");
        store.insert_item(&rent).unwrap();
        assert!(matches!(store.insert_item(&rent), Err(StoreError::Duplicate { .. })));

        rent.amount = 250;
        store.update_item(&rent).unwrap();
        assert_eq!(store.item(rent.id).unwrap().unwrap().amount, 250);
        assert_eq!(store.items(&ItemQuery::for_budget(budget.id)).unwrap().len(), 1);

        store.delete_item(rent.id).unwrap();
        assert!(store.item(rent.id).unwrap().is_none());
        assert!(matches!(store.delete_item(rent.id), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_nested_rollback_restores_only_inner_writes() {
        let mut store = MemoryStore::new();
        let budget_id = BudgetId::new();
        let outer = item(budget_id, "Outer");
        let inner = item(budget_id, "Inner");

        store.begin().unwrap();
        store.insert_item(&outer).unwrap();
        store.begin().unwrap();
        store.insert_item(&inner).unwrap();
        store.rollback().unwrap();
        store.commit().unwrap();

        assert_eq!(store.depth(), 0);
        assert!(store.item(outer.id).unwrap().is_some());
        assert!(store.item(inner.id).unwrap().is_none());
        assert_eq!(store.commit(), Err(StoreError::NoActiveTransaction));
    }

    #[test]
    fn test_atomically_rolls_back_on_error() {
        let mut store = MemoryStore::new();
        let doomed = item(BudgetId::new(), "Doomed");

        let result: Result<(), StoreError> = atomically(&mut store, |s| {
            s.insert_item(&doomed)?;
            Err(StoreError::Backend("disk full".into()))
        });

        assert!(result.is_err());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.depth(), 0);
    }
}
