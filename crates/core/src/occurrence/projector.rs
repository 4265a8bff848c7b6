//! Read-only occurrence queries over a recurring item.

use chrono::NaiveDate;

use super::types::{IntoDate, Occurrence};
use crate::item::RecurringItem;
use crate::recurrence::RecurrenceError;

/// Projects a recurring item into its occurrences.
#[derive(Debug, Clone, Copy)]
pub struct Occurrences<'a> {
    item: &'a RecurringItem,
}

impl<'a> Occurrences<'a> {
    /// Projector over `item`.
    #[must_use]
    pub const fn new(item: &'a RecurringItem) -> Self {
        Self { item }
    }

    /// Occurrences within `[start, end]`, clipped to the item's own end date.
    #[must_use]
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Occurrence> {
        self.wrap(self.item.recurrence().between(start, end))
    }

    /// Occurrences from the item's start through `end`.
    #[must_use]
    pub fn until(&self, end: NaiveDate) -> Vec<Occurrence> {
        self.between(self.item.starts_on, end)
    }

    /// The first `n` occurrences. Works without an end date.
    #[must_use]
    pub fn limit(&self, n: usize) -> Vec<Occurrence> {
        self.wrap(self.item.recurrence().first(n))
    }

    /// Every occurrence.
    ///
    /// # Errors
    ///
    /// Returns `NoEndDate` when the item has no end date.
    pub fn all(&self) -> Result<Vec<Occurrence>, RecurrenceError> {
        Ok(self.wrap(self.item.recurrence().all()?))
    }

    /// Returns true if the item has an occurrence on `date`. Unparseable input is false.
    pub fn exists(&self, date: impl IntoDate) -> bool {
        date.into_date().is_some_and(|date| self.item.recurrence().between(date, date) == [date])
    }

    /// The occurrence on `date`, if there is one. Unparseable input yields `None`.
    pub fn fetch(&self, date: impl IntoDate) -> Option<Occurrence> {
        let date = date.into_date()?;
        self.exists(date).then(|| Occurrence::new(self.item, date))
    }

    /// The `n`th occurrence, 1-based.
    #[must_use]
    pub fn ordinal(&self, n: usize) -> Option<Occurrence> {
        if n < 1 {
            return None;
        }
        let dates = self.item.recurrence().first(n);
        if dates.len() < n {
            return None;
        }
        dates.last().map(|date| Occurrence::new(self.item, *date))
    }

    /// The first occurrence.
    #[must_use]
    pub fn first(&self) -> Option<Occurrence> {
        self.ordinal(1)
    }

    /// 0-based position of `date` in the series; the number of earlier occurrences.
    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.exists(date)
            .then(|| self.item.recurrence().count_between(self.item.starts_on, date) - 1)
    }

    fn wrap(&self, dates: Vec<NaiveDate>) -> Vec<Occurrence> {
        dates.into_iter().map(|date| Occurrence::new(self.item, date)).collect()
    }
}
