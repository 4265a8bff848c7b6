//! Recurring item normalization and validation rules.

use spendful_shared::FieldErrors;
use spendful_shared::types::MAX_AMOUNT;

use super::types::RecurringItem;
use crate::store::{ItemQuery, Store, StoreError, TransactionQuery};

/// Applies the defaults every saved item obeys: once items never carry an end date.
pub fn normalize(item: &mut RecurringItem) {
    if item.is_once() {
        item.ends_on = None;
    }
}

/// Checks that need nothing but the item itself.
#[must_use]
pub fn check_fields(item: &RecurringItem) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if item.name.trim().is_empty() {
        errors.add("name", "can't be blank");
    }
    if item.amount < 0 {
        errors.add("amount", "must be greater than or equal to 0");
    } else if item.amount > MAX_AMOUNT {
        errors.add("amount", format!("must be less than or equal to {MAX_AMOUNT}"));
    }
    if let Some(ends_on) = item.ends_on
        && ends_on <= item.starts_on
    {
        errors.add("ends_on", "must be after starts on");
    }

    errors
}

/// Full validation, including the rules that consult stored budgets, items and transactions.
///
/// `persisted` is true when the item already exists in the store.
pub fn validate<S: Store + ?Sized>(
    store: &S,
    item: &RecurringItem,
    persisted: bool,
) -> Result<FieldErrors, StoreError> {
    let mut errors = check_fields(item);

    if store.budget(item.budget_id)?.is_none() {
        errors.add("budget_id", "must reference an existing budget");
    }

    if !errors.contains("name") {
        let query = ItemQuery::for_budget(item.budget_id)
            .named(item.name.clone())
            .starting_on(item.starts_on);
        if store.items(&query)?.iter().any(|other| other.id != item.id) {
            errors.add("name", "has already been taken");
        }
    }

    if persisted {
        let normal = store.transactions(&TransactionQuery::for_item(item.id).normal())?;
        if normal
            .iter()
            .any(|txn| txn.occurrence.is_some_and(|o| o < item.starts_on))
        {
            errors.add("starts_on", "cannot be after the date of an existing transaction");
        }
    }

    if let Some(ends_on) = item.ends_on {
        let txns = store.transactions(&TransactionQuery::for_item(item.id))?;
        if txns.iter().any(|txn| txn.date > ends_on) {
            errors.add("ends_on", "cannot be before the date of an existing transaction");
        }
    }

    Ok(errors)
}
