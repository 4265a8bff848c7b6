//! Recorded transaction domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use spendful_shared::types::{BudgetId, ItemId, TransactionId};

use crate::item::{Category, RecurringItem};

/// Description used when a transaction has none and is not an orphan.
pub const NO_DESCRIPTION: &str = "No description given.";

/// Classification of a transaction by its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Linked to an item and to one of its occurrences.
    Normal,
    /// Linked to an item whose occurrence no longer exists.
    Orphan,
    /// Not linked to any item.
    Misc,
}

/// Money actually received or spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Recurring item this transaction was recorded against.
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// Occurrence date within the item; only meaningful with `item_id`.
    #[serde(default)]
    pub occurrence: Option<NaiveDate>,
    /// Own category, required when there is no item.
    #[serde(default)]
    pub category: Option<Category>,
    /// Day the money moved.
    pub date: NaiveDate,
    /// Positive amount in minor units.
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Classifies the transaction.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match (self.item_id, self.occurrence) {
            (None, _) => TransactionKind::Misc,
            (Some(_), None) => TransactionKind::Orphan,
            (Some(_), Some(_)) => TransactionKind::Normal,
        }
    }

    /// Linked to an item occurrence.
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self.kind(), TransactionKind::Normal)
    }

    /// Linked to an item but not to an occurrence.
    #[must_use]
    pub const fn is_orphan(&self) -> bool {
        matches!(self.kind(), TransactionKind::Orphan)
    }

    /// Not linked to an item.
    #[must_use]
    pub const fn is_misc(&self) -> bool {
        matches!(self.kind(), TransactionKind::Misc)
    }

    /// Effective category: the item's when the item is known, otherwise the transaction's own.
    #[must_use]
    pub fn category_with(&self, item: Option<&RecurringItem>) -> Option<Category> {
        item.map(|item| item.category).or(self.category)
    }

    /// Effective description: the stored text when present, the item name for orphans,
    /// otherwise [`NO_DESCRIPTION`].
    #[must_use]
    pub fn description_with<'a>(&'a self, item: Option<&'a RecurringItem>) -> &'a str {
        match self.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => match item {
                Some(item) if self.is_orphan() => &item.name,
                _ => NO_DESCRIPTION,
            },
        }
    }

    /// Returns true if the effective category is income.
    #[must_use]
    pub fn is_income_with(&self, item: Option<&RecurringItem>) -> bool {
        self.category_with(item) == Some(Category::Income)
    }

    /// Returns true if the effective category is expense.
    #[must_use]
    pub fn is_expense_with(&self, item: Option<&RecurringItem>) -> bool {
        self.category_with(item) == Some(Category::Expense)
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Owning budget; taken from the item when absent.
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    /// Recurring item.
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// Occurrence date within the item.
    #[serde(default)]
    pub occurrence: Option<NaiveDate>,
    /// Own category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Day the money moved.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Positive amount in minor units.
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use crate::recurrence::Schedule;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(item_id: Option<ItemId>, occurrence: Option<NaiveDate>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            budget_id: BudgetId::new(),
            item_id,
            occurrence,
            category: Some(Category::Expense),
            date: ymd(2024, 1, 1),
            amount: 100,
            description: None,
        }
    }

    fn rent() -> RecurringItem {
        NewItem {
            budget_id: BudgetId::new(),
            category: Category::Income,
            name: "Rent".into(),
            amount: 100,
            schedule: Some(Schedule::Monthly),
            starts_on: ymd(2024, 1, 1),
            ends_on: None,
        }
        .into_item()
    }

    #[test]
    fn test_kind_classification() {
        let item_id = ItemId::new();
        assert_eq!(txn(Some(item_id), Some(ymd(2024, 1, 1))).kind(), TransactionKind::Normal);
        assert_eq!(txn(Some(item_id), None).kind(), TransactionKind::Orphan);
        assert_eq!(txn(None, None).kind(), TransactionKind::Misc);
        // an occurrence without an item is still misc
        assert_eq!(txn(None, Some(ymd(2024, 1, 1))).kind(), TransactionKind::Misc);
    }

    #[test]
    fn test_item_category_wins() {
        let item = rent();
        let t = txn(Some(item.id), None);
        assert_eq!(t.category_with(Some(&item)), Some(Category::Income));
        assert_eq!(t.category_with(None), Some(Category::Expense));
        assert!(t.is_income_with(Some(&item)));
        assert!(t.is_expense_with(None));
    }

    #[test]
    fn test_description_fallbacks() {
        let item = rent();
        let mut orphan = txn(Some(item.id), None);
        assert_eq!(orphan.description_with(Some(&item)), "Rent");

        let normal = txn(Some(item.id), Some(ymd(2024, 1, 1)));
        assert_eq!(normal.description_with(Some(&item)), NO_DESCRIPTION);

        orphan.description = Some("   ".into());
        assert_eq!(orphan.description_with(Some(&item)), "Rent");
        orphan.description = Some("January rent".into());
        assert_eq!(orphan.description_with(Some(&item)), "January rent");
    }
}
