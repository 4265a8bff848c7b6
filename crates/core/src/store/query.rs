//! Query predicates understood by every [`Store`](super::Store).

use chrono::NaiveDate;
use spendful_shared::types::{BudgetId, ItemId};

use crate::item::{Category, RecurringItem};
use crate::transaction::{Transaction, TransactionKind};

/// Predicate over recurring items. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Owning budget.
    pub budget_id: Option<BudgetId>,
    /// Category.
    pub category: Option<Category>,
    /// Exact name.
    pub name: Option<String>,
    /// Exact start date.
    pub starts_on: Option<NaiveDate>,
}

impl ItemQuery {
    /// Items of `budget_id`.
    #[must_use]
    pub fn for_budget(budget_id: BudgetId) -> Self {
        Self {
            budget_id: Some(budget_id),
            ..Self::default()
        }
    }

    /// Restricts to `category`.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to items called `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restricts to items starting on `date`.
    #[must_use]
    pub fn starting_on(mut self, date: NaiveDate) -> Self {
        self.starts_on = Some(date);
        self
    }

    /// Returns true if `item` satisfies every set field.
    #[must_use]
    pub fn matches(&self, item: &RecurringItem) -> bool {
        self.budget_id.is_none_or(|id| item.budget_id == id)
            && self.category.is_none_or(|c| item.category == c)
            && self.name.as_deref().is_none_or(|n| item.name == n)
            && self.starts_on.is_none_or(|d| item.starts_on == d)
    }
}

/// Which link classes a transaction query accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    /// Exactly one kind.
    Only(TransactionKind),
    /// Misc or orphan: not tied to an occurrence.
    Unlinked,
}

impl KindFilter {
    fn accepts(self, kind: TransactionKind) -> bool {
        match self {
            Self::Only(wanted) => kind == wanted,
            Self::Unlinked => matches!(kind, TransactionKind::Misc | TransactionKind::Orphan),
        }
    }
}

/// Predicate over transactions. Unset fields match everything; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Owning budget.
    pub budget_id: Option<BudgetId>,
    /// Linked item.
    pub item_id: Option<ItemId>,
    /// Link class.
    pub kind: Option<KindFilter>,
    /// Exact occurrence date.
    pub occurrence: Option<NaiveDate>,
    /// Occurrence date strictly after this day.
    pub occurrence_after: Option<NaiveDate>,
    /// Occurrence date outside this inclusive window.
    pub occurrence_outside: Option<(NaiveDate, NaiveDate)>,
    /// Earliest transaction date.
    pub date_from: Option<NaiveDate>,
    /// Latest transaction date.
    pub date_to: Option<NaiveDate>,
}

impl TransactionQuery {
    /// Transactions of `budget_id`.
    #[must_use]
    pub fn for_budget(budget_id: BudgetId) -> Self {
        Self {
            budget_id: Some(budget_id),
            ..Self::default()
        }
    }

    /// Transactions linked to `item_id`.
    #[must_use]
    pub fn for_item(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Self::default()
        }
    }

    /// Only normal transactions.
    #[must_use]
    pub fn normal(mut self) -> Self {
        self.kind = Some(KindFilter::Only(TransactionKind::Normal));
        self
    }

    /// Only orphan transactions.
    #[must_use]
    pub fn orphan(mut self) -> Self {
        self.kind = Some(KindFilter::Only(TransactionKind::Orphan));
        self
    }

    /// Only misc transactions.
    #[must_use]
    pub fn misc(mut self) -> Self {
        self.kind = Some(KindFilter::Only(TransactionKind::Misc));
        self
    }

    /// Misc or orphan transactions.
    #[must_use]
    pub fn unlinked(mut self) -> Self {
        self.kind = Some(KindFilter::Unlinked);
        self
    }

    /// Linked to the occurrence on `date`.
    #[must_use]
    pub fn on_occurrence(mut self, date: NaiveDate) -> Self {
        self.occurrence = Some(date);
        self
    }

    /// Occurrence strictly after `date`.
    #[must_use]
    pub fn occurrence_after(mut self, date: NaiveDate) -> Self {
        self.occurrence_after = Some(date);
        self
    }

    /// Occurrence set and outside `[start, end]`.
    #[must_use]
    pub fn occurrence_outside(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.occurrence_outside = Some((start, end));
        self
    }

    /// Dated within `[start, end]`.
    #[must_use]
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_from = Some(start);
        self.date_to = Some(end);
        self
    }

    /// Dated on or before `end`.
    #[must_use]
    pub fn up_to(mut self, end: NaiveDate) -> Self {
        self.date_to = Some(end);
        self
    }

    /// Returns true if `txn` satisfies every set field.
    #[must_use]
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.budget_id.is_none_or(|id| txn.budget_id == id)
            && self.item_id.is_none_or(|id| txn.item_id == Some(id))
            && self.kind.is_none_or(|kind| kind.accepts(txn.kind()))
            && self.occurrence.is_none_or(|d| txn.occurrence == Some(d))
            && self
                .occurrence_after
                .is_none_or(|d| txn.occurrence.is_some_and(|o| o > d))
            && self
                .occurrence_outside
                .is_none_or(|(start, end)| txn.occurrence.is_some_and(|o| o < start || o > end))
            && self.date_from.is_none_or(|d| txn.date >= d)
            && self.date_to.is_none_or(|d| txn.date <= d)
    }
}
