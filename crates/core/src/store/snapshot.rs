//! JSON interchange format for a whole store.

use serde::{Deserialize, Serialize};

use crate::budget::Budget;
use crate::item::RecurringItem;
use crate::transaction::Transaction;

/// Every record of a store, as loaded from or written to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Budgets.
    #[serde(default)]
    pub budgets: Vec<Budget>,
    /// Recurring items.
    #[serde(default)]
    pub items: Vec<RecurringItem>,
    /// Transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
