//! Recording, relinking and deleting transactions.

use spendful_shared::FieldErrors;
use spendful_shared::types::{MAX_AMOUNT, TransactionId};
use tracing::debug;

use super::error::TransactionError;
use super::types::{NewTransaction, Transaction};
use crate::item::{Category, RecurringItem};
use crate::store::{Store, StoreError};

/// Stateless service for transaction persistence.
pub struct TransactionService;

impl TransactionService {
    /// Builds and saves a new transaction.
    ///
    /// The budget defaults to the item's budget, and an occurrence without
    /// an item is dropped.
    pub fn create<S: Store + ?Sized>(store: &mut S, input: NewTransaction) -> Result<Transaction, TransactionError> {
        let item = match input.item_id {
            Some(id) => store.item(id)?,
            None => None,
        };

        let mut errors = FieldErrors::new();
        let budget_id = input.budget_id.or(item.as_ref().map(|item| item.budget_id));
        if budget_id.is_none() {
            errors.add("budget_id", "can't be blank");
        }
        if input.date.is_none() {
            errors.add("date", "can't be blank");
        }
        let (Some(budget_id), Some(date)) = (budget_id, input.date) else {
            return Err(TransactionError::Invalid(errors));
        };

        let mut txn = Transaction {
            id: TransactionId::new(),
            budget_id,
            item_id: input.item_id,
            occurrence: input.occurrence,
            category: input.category,
            date,
            amount: input.amount,
            description: input.description,
        };
        Self::save(store, &mut txn)?;
        Ok(txn)
    }

    /// Validates and writes `txn`, inserting it when it is not stored yet.
    pub fn save<S: Store + ?Sized>(store: &mut S, txn: &mut Transaction) -> Result<(), TransactionError> {
        if txn.item_id.is_none() {
            txn.occurrence = None;
        }

        let errors = Self::validate(store, txn)?;
        if !errors.is_empty() {
            debug!(transaction_id = %txn.id, errors = %errors, "transaction rejected");
            return Err(TransactionError::Invalid(errors));
        }

        if store.transaction(txn.id)?.is_some() {
            store.update_transaction(txn)?;
        } else {
            store.insert_transaction(txn)?;
        }
        Ok(())
    }

    /// Field-keyed validation messages for `txn`.
    pub fn validate<S: Store + ?Sized>(store: &S, txn: &Transaction) -> Result<FieldErrors, StoreError> {
        let mut errors = FieldErrors::new();

        if store.budget(txn.budget_id)?.is_none() {
            errors.add("budget_id", "must reference an existing budget");
        }
        if txn.amount <= 0 {
            errors.add("amount", "must be greater than 0");
        } else if txn.amount > MAX_AMOUNT {
            errors.add("amount", format!("must be less than or equal to {MAX_AMOUNT}"));
        }
        if txn.item_id.is_none() && txn.category.is_none() {
            errors.add("category", "can't be blank");
        }

        if let (Some(item_id), Some(occurrence)) = (txn.item_id, txn.occurrence)
            && let Some(item) = store.item(item_id)?
            && !item.occurrences().exists(occurrence)
        {
            errors.add("occurrence", "must be one of the item occurrences");
        }

        Ok(errors)
    }

    /// Clears the occurrence link, keeping the item link.
    pub fn orphan<S: Store + ?Sized>(store: &mut S, id: TransactionId) -> Result<Transaction, TransactionError> {
        Self::relink(store, id, |txn| txn.occurrence = None)
    }

    /// Clears the item link, making the transaction miscellaneous.
    ///
    /// The item's category is copied onto the transaction first so it stays classifiable.
    pub fn make_misc<S: Store + ?Sized>(store: &mut S, id: TransactionId) -> Result<Transaction, TransactionError> {
        let item_category = Self::item_of(store, &Self::load(store, id)?)?.map(|item| item.category);
        Self::relink(store, id, |txn| {
            txn.category = item_category.or(txn.category);
            txn.item_id = None;
            txn.occurrence = None;
        })
    }

    /// Deletes a transaction.
    pub fn destroy<S: Store + ?Sized>(store: &mut S, id: TransactionId) -> Result<(), TransactionError> {
        Self::load(store, id)?;
        store.delete_transaction(id)?;
        Ok(())
    }

    /// The transaction's item, when it still exists.
    pub fn item_of<S: Store + ?Sized>(store: &S, txn: &Transaction) -> Result<Option<RecurringItem>, StoreError> {
        match txn.item_id {
            Some(id) => store.item(id),
            None => Ok(None),
        }
    }

    /// Effective category, resolved through the item.
    pub fn category<S: Store + ?Sized>(store: &S, txn: &Transaction) -> Result<Option<Category>, StoreError> {
        Ok(txn.category_with(Self::item_of(store, txn)?.as_ref()))
    }

    /// Effective description, resolved through the item.
    pub fn description<S: Store + ?Sized>(store: &S, txn: &Transaction) -> Result<String, StoreError> {
        let item = Self::item_of(store, txn)?;
        Ok(txn.description_with(item.as_ref()).to_string())
    }

    fn load<S: Store + ?Sized>(store: &S, id: TransactionId) -> Result<Transaction, TransactionError> {
        store.transaction(id)?.ok_or(TransactionError::NotFound(id))
    }

    /// Rewrites links without validation.
    fn relink<S: Store + ?Sized>(
        store: &mut S,
        id: TransactionId,
        change: impl FnOnce(&mut Transaction),
    ) -> Result<Transaction, TransactionError> {
        let mut txn = Self::load(store, id)?;
        change(&mut txn);
        store.update_transaction(&txn)?;
        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;
    use crate::item::{ItemService, NewItem};
    use crate::recurrence::Schedule;
    use crate::store::MemoryStore;
    use crate::transaction::{NO_DESCRIPTION, TransactionKind};
    use chrono::NaiveDate;
    use spendful_shared::types::BudgetId;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (MemoryStore, BudgetId, RecurringItem) {
        let mut store = MemoryStore::new();
        let budget = Budget::new("Household", 0, ymd(2024, 1, 1));
        store.save_budget(&budget).unwrap();
        let rent = ItemService::create(
            &mut store,
            NewItem {
                budget_id: budget.id,
                category: Category::Expense,
                name: "Rent".into(),
                amount: 90_000,
                schedule: Some(Schedule::Monthly),
                starts_on: ymd(2024, 1, 1),
                ends_on: None,
            },
        )
        .unwrap();
        (store, budget.id, rent)
    }

    #[test]
    fn test_budget_defaults_from_item() {
        let (mut store, budget_id, rent) = setup();
        let txn = TransactionService::create(
            &mut store,
            NewTransaction {
                item_id: Some(rent.id),
                occurrence: Some(ymd(2024, 2, 1)),
                date: Some(ymd(2024, 2, 2)),
                amount: 90_000,
                ..NewTransaction::default()
            },
        )
        .unwrap();
        assert_eq!(txn.budget_id, budget_id);
        assert_eq!(txn.kind(), TransactionKind::Normal);
        assert_eq!(TransactionService::category(&store, &txn).unwrap(), Some(Category::Expense));
        assert_eq!(TransactionService::description(&store, &txn).unwrap(), NO_DESCRIPTION);
    }

    #[test]
    fn test_occurrence_must_exist_on_item() {
        let (mut store, _, rent) = setup();
        let err = TransactionService::create(
            &mut store,
            NewTransaction {
                item_id: Some(rent.id),
                occurrence: Some(ymd(2024, 2, 2)),
                date: Some(ymd(2024, 2, 2)),
                amount: 100,
                ..NewTransaction::default()
            },
        )
        .unwrap_err();
        let TransactionError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("occurrence"), ["must be one of the item occurrences"]);
    }

    #[test]
    fn test_misc_requires_category_and_positive_amount() {
        let (mut store, budget_id, _) = setup();
        let err = TransactionService::create(
            &mut store,
            NewTransaction {
                budget_id: Some(budget_id),
                date: Some(ymd(2024, 2, 2)),
                amount: 0,
                ..NewTransaction::default()
            },
        )
        .unwrap_err();
        let TransactionError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.contains("category"));
        assert_eq!(errors.get("amount"), ["must be greater than 0"]);
    }

    #[test]
    fn test_missing_budget_and_date() {
        let (mut store, _, _) = setup();
        let err = TransactionService::create(&mut store, NewTransaction { amount: 5, ..NewTransaction::default() })
            .unwrap_err();
        let TransactionError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.contains("budget_id"));
        assert!(errors.contains("date"));
    }

    #[test]
    fn test_occurrence_dropped_without_item() {
        let (mut store, budget_id, _) = setup();
        let txn = TransactionService::create(
            &mut store,
            NewTransaction {
                budget_id: Some(budget_id),
                category: Some(Category::Income),
                occurrence: Some(ymd(2024, 2, 1)),
                date: Some(ymd(2024, 2, 1)),
                amount: 700,
                description: Some("Gift".into()),
                ..NewTransaction::default()
            },
        )
        .unwrap();
        assert_eq!(txn.occurrence, None);
        assert!(txn.is_misc());
        assert_eq!(TransactionService::description(&store, &txn).unwrap(), "Gift");
    }

    #[test]
    fn test_orphan_then_misc() {
        let (mut store, _, rent) = setup();
        let txn = TransactionService::create(
            &mut store,
            NewTransaction {
                item_id: Some(rent.id),
                occurrence: Some(ymd(2024, 3, 1)),
                date: Some(ymd(2024, 3, 1)),
                amount: 90_000,
                ..NewTransaction::default()
            },
        )
        .unwrap();

        let orphan = TransactionService::orphan(&mut store, txn.id).unwrap();
        assert!(orphan.is_orphan());
        assert_eq!(TransactionService::description(&store, &orphan).unwrap(), "Rent");

        let misc = TransactionService::make_misc(&mut store, txn.id).unwrap();
        assert!(misc.is_misc());
        assert_eq!(misc.category, Some(Category::Expense));

        TransactionService::destroy(&mut store, txn.id).unwrap();
        assert!(matches!(
            TransactionService::destroy(&mut store, txn.id),
            Err(TransactionError::NotFound(_))
        ));
    }
}
