//! Budget data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendful_shared::types::{BudgetId, beginning_of_month, end_of_month};

use crate::item::Category;

/// A budget: owns recurring items and transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// URL-friendly name.
    #[serde(default)]
    pub slug: String,
    /// Opening balance in minor units; may be negative.
    pub initial_balance: i64,
    /// Day the budget was created.
    pub created_on: NaiveDate,
}

impl Budget {
    /// Creates an unsaved budget.
    #[must_use]
    pub fn new(name: impl Into<String>, initial_balance: i64, created_on: NaiveDate) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            slug: String::new(),
            initial_balance,
            created_on,
        }
    }

    /// First day of the creation month; the fallback "beginning" of the budget.
    #[must_use]
    pub fn beginning(&self) -> NaiveDate {
        beginning_of_month(self.created_on)
    }
}

/// Date window and category filter for budget listings.
///
/// Missing bounds default to the month containing "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    /// Lower bound.
    pub starting: Option<NaiveDate>,
    /// Upper bound.
    pub ending: Option<NaiveDate>,
    /// Restrict to one category.
    pub category: Option<Category>,
}

impl PeriodFilter {
    /// Filter for an explicit window.
    #[must_use]
    pub const fn between(starting: NaiveDate, ending: NaiveDate) -> Self {
        Self {
            starting: Some(starting),
            ending: Some(ending),
            category: None,
        }
    }

    /// Restricts the filter to `category`.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Resolves missing bounds against the month containing `today`.
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            self.starting.unwrap_or_else(|| beginning_of_month(today)),
            self.ending.unwrap_or_else(|| end_of_month(today)),
        )
    }
}
