//! Budget persistence and budget-wide listings.

use std::collections::HashMap;

use chrono::NaiveDate;
use spendful_shared::FieldErrors;
use spendful_shared::types::{BudgetId, ItemId, MAX_AMOUNT, parameterize};

use super::error::BudgetError;
use super::types::{Budget, PeriodFilter};
use crate::item::{Category, RecurringItem};
use crate::occurrence::Occurrence;
use crate::store::{ItemQuery, Store, StoreError, TransactionQuery};
use crate::transaction::Transaction;

/// Stateless service for budgets.
pub struct BudgetService;

impl BudgetService {
    /// Validates and writes `budget`, refreshing its slug.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` with field-keyed messages if a rule fails.
    pub fn save<S: Store + ?Sized>(store: &mut S, budget: &mut Budget) -> Result<(), BudgetError> {
        let errors = Self::validate(budget);
        if !errors.is_empty() {
            return Err(BudgetError::Invalid(errors));
        }
        budget.slug = parameterize(&budget.name);
        store.save_budget(budget)?;
        Ok(())
    }

    /// Field-keyed validation messages for `budget`.
    #[must_use]
    pub fn validate(budget: &Budget) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if budget.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if budget.initial_balance > MAX_AMOUNT {
            errors.add("initial_balance", format!("must be less than or equal to {MAX_AMOUNT}"));
        }
        errors
    }

    /// Loads a budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such budget.
    pub fn find<S: Store + ?Sized>(store: &S, id: BudgetId) -> Result<Budget, BudgetError> {
        store.budget(id)?.ok_or(BudgetError::NotFound(id))
    }

    /// Occurrences of every item of the budget within the filter window,
    /// ordered by date and then item name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown budget, or a store error.
    pub fn occurrences<S: Store + ?Sized>(
        store: &S,
        budget_id: BudgetId,
        filter: PeriodFilter,
        today: NaiveDate,
    ) -> Result<Vec<Occurrence>, BudgetError> {
        Self::find(store, budget_id)?;
        let (starting, ending) = filter.resolve(today);

        let mut query = ItemQuery::for_budget(budget_id);
        if let Some(category) = filter.category {
            query = query.category(category);
        }

        let mut occurrences: Vec<Occurrence> = store
            .items(&query)?
            .iter()
            .flat_map(|item| item.occurrences().between(starting, ending))
            .collect();
        occurrences.sort_by(|a, b| a.date().cmp(&b.date()).then_with(|| a.name().cmp(b.name())));
        Ok(occurrences)
    }

    /// Misc and orphan transactions dated strictly inside the filter window.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown budget, or a store error.
    pub fn misc_transactions<S: Store + ?Sized>(
        store: &S,
        budget_id: BudgetId,
        filter: PeriodFilter,
        today: NaiveDate,
    ) -> Result<Vec<Transaction>, BudgetError> {
        Self::find(store, budget_id)?;
        let (starting, ending) = filter.resolve(today);
        let items = Self::items_by_id(store, budget_id)?;

        let txns = store.transactions(&TransactionQuery::for_budget(budget_id).unlinked())?;
        Ok(txns
            .into_iter()
            .filter(|txn| txn.date > starting && txn.date < ending)
            .filter(|txn| {
                filter
                    .category
                    .is_none_or(|category| Self::category_of(txn, &items) == Some(category))
            })
            .collect())
    }

    /// Items of the budget keyed by id.
    pub(super) fn items_by_id<S: Store + ?Sized>(
        store: &S,
        budget_id: BudgetId,
    ) -> Result<HashMap<ItemId, RecurringItem>, StoreError> {
        Ok(store
            .items(&ItemQuery::for_budget(budget_id))?
            .into_iter()
            .map(|item| (item.id, item))
            .collect())
    }

    /// Effective category of `txn` given the budget's items.
    pub(super) fn category_of(txn: &Transaction, items: &HashMap<ItemId, RecurringItem>) -> Option<Category> {
        txn.category_with(txn.item_id.and_then(|id| items.get(&id)))
    }
}
