//! Recurring item domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendful_shared::types::{BudgetId, ItemId};

use crate::occurrence::Occurrences;
use crate::recurrence::{Recurrence, RecurrenceState, Schedule};

/// Whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Money in; adds to the balance.
    Income,
    /// Money out; subtracts from the balance.
    Expense,
}

impl Category {
    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Applies the sign convention: income adds, expense subtracts.
    #[must_use]
    pub const fn signed(&self, amount: i64) -> i64 {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A budgeted income or expense that expands into dated occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringItem {
    /// Item identifier.
    pub id: ItemId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Income or expense.
    pub category: Category,
    /// Display name, unique within (budget, starts_on).
    pub name: String,
    /// URL-friendly name, unique within the budget.
    #[serde(default)]
    pub slug: String,
    /// Amount per occurrence in minor units.
    pub amount: i64,
    /// Repeat kind.
    pub schedule: Schedule,
    /// First day of the series.
    pub starts_on: NaiveDate,
    /// Last day of the series; always `None` for once items.
    pub ends_on: Option<NaiveDate>,
    /// Rule, exception dates and extra dates.
    pub recurrence: RecurrenceState,
}

impl RecurringItem {
    /// The recurrence bound to this item's window.
    #[must_use]
    pub fn recurrence(&self) -> Recurrence<'_> {
        Recurrence::new(&self.recurrence, self.starts_on, self.ends_on)
    }

    /// Occurrence projector over this item.
    #[must_use]
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences::new(self)
    }

    /// Returns true for single-occurrence items.
    #[must_use]
    pub const fn is_once(&self) -> bool {
        self.schedule.is_once()
    }

    /// Returns true for income items.
    #[must_use]
    pub const fn is_income(&self) -> bool {
        matches!(self.category, Category::Income)
    }

    /// Returns true for expense items.
    #[must_use]
    pub const fn is_expense(&self) -> bool {
        matches!(self.category, Category::Expense)
    }
}

/// Input for creating a recurring item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Income or expense.
    pub category: Category,
    /// Display name.
    pub name: String,
    /// Amount per occurrence in minor units.
    pub amount: i64,
    /// Repeat kind; defaults to once.
    #[serde(default)]
    pub schedule: Option<Schedule>,
    /// First day of the series.
    pub starts_on: NaiveDate,
    /// Last day of the series.
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
}

impl NewItem {
    /// Builds an unsaved item with a fresh id and recurrence state.
    #[must_use]
    pub fn into_item(self) -> RecurringItem {
        let schedule = self.schedule.unwrap_or_default();
        RecurringItem {
            id: ItemId::new(),
            budget_id: self.budget_id,
            category: self.category,
            name: self.name,
            slug: String::new(),
            amount: self.amount,
            schedule,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            recurrence: RecurrenceState::new(schedule, self.starts_on),
        }
    }
}
