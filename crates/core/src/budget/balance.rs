//! Balance projection.
//!
//! Up to today the balance is built from recorded transactions only. Past
//! today it blends in what the items are still expected to bring in or
//! cost, counting the larger of the budgeted and the recorded amount for
//! each occurrence.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendful_shared::types::{BudgetId, ItemId, beginning_of_month};
use tracing::warn;

use super::error::BudgetError;
use super::service::BudgetService;
use crate::item::{Category, RecurringItem};
use crate::store::{Store, TransactionQuery};
use crate::transaction::Transaction;

/// A projected balance and the totals it is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Day the balance is projected to.
    pub as_of: NaiveDate,
    /// Opening balance of the budget.
    pub initial_balance: i64,
    /// Income counted, in minor units.
    pub income: i64,
    /// Expense counted, in minor units.
    pub expense: i64,
}

impl Projection {
    /// Creates an empty projection.
    #[must_use]
    pub const fn new(as_of: NaiveDate, initial_balance: i64) -> Self {
        Self {
            as_of,
            initial_balance,
            income: 0,
            expense: 0,
        }
    }

    /// Adds an amount to the total of `category`.
    pub fn add(&mut self, category: Category, amount: i64) {
        match category {
            Category::Income => self.income += amount,
            Category::Expense => self.expense += amount,
        }
    }

    /// Opening balance plus income minus expense.
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.initial_balance + self.income - self.expense
    }
}

/// Stateless service for balance projection.
pub struct BalanceService;

impl BalanceService {
    /// Projected balance of the budget on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown budget, or a store error.
    pub fn balance<S: Store + ?Sized>(
        store: &S,
        budget_id: BudgetId,
        as_of: NaiveDate,
        today: NaiveDate,
    ) -> Result<i64, BudgetError> {
        Ok(Self::project(store, budget_id, as_of, today)?.balance())
    }

    /// Projected balance of the budget on `as_of`, with its income and expense totals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown budget, or a store error.
    pub fn project<S: Store + ?Sized>(
        store: &S,
        budget_id: BudgetId,
        as_of: NaiveDate,
        today: NaiveDate,
    ) -> Result<Projection, BudgetError> {
        let budget = BudgetService::find(store, budget_id)?;
        let items = BudgetService::items_by_id(store, budget_id)?;
        let mut projection = Projection::new(as_of, budget.initial_balance);

        let recorded = store.transactions(&TransactionQuery::for_budget(budget_id).up_to(as_of.min(today)))?;
        Self::add_transactions(&mut projection, &recorded, &items);

        let Some(tomorrow) = today.succ_opt().filter(|_| as_of > today) else {
            return Ok(projection);
        };

        for item in items.values() {
            for occurrence in item.occurrences().between(beginning_of_month(today), as_of) {
                let linked = store.transactions(
                    &TransactionQuery::for_item(item.id)
                        .on_occurrence(occurrence.date())
                        .up_to(as_of),
                )?;
                let total: i64 = linked.iter().map(|txn| txn.amount).sum();
                let counted: i64 = linked
                    .iter()
                    .filter(|txn| txn.date <= today)
                    .map(|txn| txn.amount)
                    .sum();
                projection.add(item.category, occurrence.amount().max(total) - counted);
            }
        }

        // transactions paid early or late relative to their occurrence
        let off_window = store.transactions(
            &TransactionQuery::for_budget(budget_id)
                .normal()
                .between(tomorrow, as_of)
                .occurrence_outside(tomorrow, as_of),
        )?;
        Self::add_transactions(&mut projection, &off_window, &items);

        let unlinked = store.transactions(&TransactionQuery::for_budget(budget_id).unlinked().between(tomorrow, as_of))?;
        Self::add_transactions(&mut projection, &unlinked, &items);

        Ok(projection)
    }

    fn add_transactions(projection: &mut Projection, txns: &[Transaction], items: &HashMap<ItemId, RecurringItem>) {
        for txn in txns {
            match BudgetService::category_of(txn, items) {
                Some(category) => projection.add(category, txn.amount),
                None => warn!(transaction_id = %txn.id, "transaction without category left out of balance"),
            }
        }
    }
}
