//! Occurrence value types and pending-change tracking.

use chrono::NaiveDate;
use spendful_shared::FieldErrors;
use spendful_shared::types::{ItemId, parse_date};

use crate::item::{Category, RecurringItem};
use crate::recurrence::Schedule;
use crate::store::{Store, StoreError, TransactionQuery};
use crate::transaction::Transaction;

/// Anything that can name a date: a date, an optional date or date text.
///
/// Text that does not parse yields `None`.
pub trait IntoDate {
    /// Converts into a date, if possible.
    fn into_date(self) -> Option<NaiveDate>;
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> Option<NaiveDate> {
        Some(self)
    }
}

impl IntoDate for Option<NaiveDate> {
    fn into_date(self) -> Option<NaiveDate> {
        self
    }
}

impl IntoDate for &str {
    fn into_date(self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl IntoDate for &String {
    fn into_date(self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl IntoDate for String {
    fn into_date(self) -> Option<NaiveDate> {
        parse_date(&self)
    }
}

/// A user-entered date for `starts_on` or `ends_on`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateEntry {
    /// A parsed date.
    Date(NaiveDate),
    /// Empty input.
    Blank,
    /// Input that is not a date.
    Invalid(String),
}

impl DateEntry {
    /// Classifies raw input.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Blank;
        }
        parse_date(text).map_or_else(|| Self::Invalid(text.to_string()), Self::Date)
    }

    /// The date, when the entry holds one.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Blank | Self::Invalid(_) => None,
        }
    }
}

impl From<NaiveDate> for DateEntry {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<Option<NaiveDate>> for DateEntry {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Blank, Self::Date)
    }
}

/// Proposed new values for an occurrence. Unset fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// New occurrence date.
    pub date: Option<NaiveDate>,
    /// New item name.
    pub name: Option<String>,
    /// New schedule.
    pub schedule: Option<Schedule>,
    /// New series start.
    pub starts_on: Option<DateEntry>,
    /// New series end; `Blank` clears it.
    pub ends_on: Option<DateEntry>,
    /// New amount in minor units.
    pub amount: Option<i64>,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the occurrence to `date`.
    #[must_use]
    pub const fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Renames the item.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the schedule.
    #[must_use]
    pub const fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Moves the series start.
    #[must_use]
    pub fn starts_on(mut self, date: impl Into<DateEntry>) -> Self {
        self.starts_on = Some(date.into());
        self
    }

    /// Moves the series start from user input.
    #[must_use]
    pub fn starts_on_text(mut self, text: &str) -> Self {
        self.starts_on = Some(DateEntry::parse(text));
        self
    }

    /// Moves or clears the series end.
    #[must_use]
    pub fn ends_on(mut self, date: impl Into<DateEntry>) -> Self {
        self.ends_on = Some(date.into());
        self
    }

    /// Moves or clears the series end from user input.
    #[must_use]
    pub fn ends_on_text(mut self, text: &str) -> Self {
        self.ends_on = Some(DateEntry::parse(text));
        self
    }

    /// Changes the amount.
    #[must_use]
    pub const fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.name.is_none()
            && self.schedule.is_none()
            && self.starts_on.is_none()
            && self.ends_on.is_none()
            && self.amount.is_none()
    }
}

/// One dated instance of a recurring item.
///
/// An occurrence refers to its item by id and carries the item's values
/// as of the moment it was projected. Setters record proposed values;
/// [`Occurrence::save`] applies them to the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub(super) item_id: ItemId,
    pub(super) date: NaiveDate,
    pub(super) category: Category,
    pub(super) name: String,
    pub(super) schedule: Schedule,
    pub(super) starts_on: NaiveDate,
    pub(super) ends_on: Option<NaiveDate>,
    pub(super) amount: i64,
    pub(super) changes: ChangeSet,
    pub(super) errors: FieldErrors,
}

impl Occurrence {
    /// The occurrence of `item` on `date`.
    #[must_use]
    pub fn new(item: &RecurringItem, date: NaiveDate) -> Self {
        Self {
            item_id: item.id,
            date,
            category: item.category,
            name: item.name.clone(),
            schedule: item.schedule,
            starts_on: item.starts_on,
            ends_on: item.ends_on,
            amount: item.amount,
            changes: ChangeSet::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Id of the item this occurrence belongs to.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Occurrence date, including a pending change.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.changes.date.unwrap_or(self.date)
    }

    /// Date as last saved.
    #[must_use]
    pub const fn date_was(&self) -> NaiveDate {
        self.date
    }

    /// Item category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Item name, including a pending change.
    #[must_use]
    pub fn name(&self) -> &str {
        self.changes.name.as_deref().unwrap_or(&self.name)
    }

    /// Item schedule, including a pending change.
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        self.changes.schedule.unwrap_or(self.schedule)
    }

    /// Series start, including a valid pending change.
    #[must_use]
    pub fn starts_on(&self) -> NaiveDate {
        self.changes
            .starts_on
            .as_ref()
            .and_then(DateEntry::date)
            .unwrap_or(self.starts_on)
    }

    /// Series end, including a pending change. A blank entry clears it.
    #[must_use]
    pub fn ends_on(&self) -> Option<NaiveDate> {
        match &self.changes.ends_on {
            Some(DateEntry::Date(date)) => Some(*date),
            Some(DateEntry::Blank) => None,
            Some(DateEntry::Invalid(_)) | None => self.ends_on,
        }
    }

    /// Amount, including a pending change.
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.changes.amount.unwrap_or(self.amount)
    }

    /// Proposes a new date.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.changes.date = (date != self.date).then_some(date);
    }

    /// Proposes a new name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.changes.name = (name != self.name).then_some(name);
    }

    /// Proposes a new schedule.
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.changes.schedule = (schedule != self.schedule).then_some(schedule);
    }

    /// Proposes a new series start.
    pub fn set_starts_on(&mut self, entry: impl Into<DateEntry>) {
        let entry = entry.into();
        self.changes.starts_on = (entry != DateEntry::Date(self.starts_on)).then_some(entry);
    }

    /// Proposes a new series start from user input.
    pub fn set_starts_on_text(&mut self, text: &str) {
        self.set_starts_on(DateEntry::parse(text));
    }

    /// Proposes a new series end; `None` clears it.
    pub fn set_ends_on(&mut self, entry: impl Into<DateEntry>) {
        let entry = entry.into();
        self.changes.ends_on = (entry != DateEntry::from(self.ends_on)).then_some(entry);
    }

    /// Proposes a new series end from user input; blank text clears it.
    pub fn set_ends_on_text(&mut self, text: &str) {
        self.set_ends_on(DateEntry::parse(text));
    }

    /// Proposes a new amount.
    pub fn set_amount(&mut self, amount: i64) {
        self.changes.amount = (amount != self.amount).then_some(amount);
    }

    /// Routes every set field of `changes` through its setter.
    pub fn assign(&mut self, changes: ChangeSet) {
        let ChangeSet {
            date,
            name,
            schedule,
            starts_on,
            ends_on,
            amount,
        } = changes;
        if let Some(date) = date {
            self.set_date(date);
        }
        if let Some(name) = name {
            self.set_name(name);
        }
        if let Some(schedule) = schedule {
            self.set_schedule(schedule);
        }
        if let Some(entry) = starts_on {
            self.set_starts_on(entry);
        }
        if let Some(entry) = ends_on {
            self.set_ends_on(entry);
        }
        if let Some(amount) = amount {
            self.set_amount(amount);
        }
    }

    /// Fields with a pending change.
    #[must_use]
    pub const fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Returns true if any field has a pending change.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Errors from the last save.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns true if the last save recorded no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 1-based position of this occurrence within `item`'s series.
    #[must_use]
    pub fn ordinal_in(&self, item: &RecurringItem) -> usize {
        item.recurrence().count_between(item.starts_on, self.date)
    }

    /// Transactions recorded against this occurrence, ordered by date.
    pub fn transactions<S: Store + ?Sized>(&self, store: &S) -> Result<Vec<Transaction>, StoreError> {
        let mut txns = store.transactions(&TransactionQuery::for_item(self.item_id).on_occurrence(self.date))?;
        txns.sort_by_key(|txn| txn.date);
        Ok(txns)
    }

    /// Total recorded against this occurrence.
    pub fn actual<S: Store + ?Sized>(&self, store: &S) -> Result<i64, StoreError> {
        Ok(self.transactions(store)?.iter().map(|txn| txn.amount).sum())
    }

    /// Makes the pending date the saved one and takes every other value
    /// from `item`, the item the occurrence belongs to after the save.
    pub(super) fn accept_changes(&mut self, item: &RecurringItem) {
        self.date = self.date();
        self.item_id = item.id;
        self.category = item.category;
        self.name.clone_from(&item.name);
        self.schedule = item.schedule;
        self.starts_on = item.starts_on;
        self.ends_on = item.ends_on;
        self.amount = item.amount;
        self.changes = ChangeSet::default();
    }

    /// Drops every pending value.
    pub(super) fn discard_changes(&mut self) {
        self.changes = ChangeSet::default();
    }
}
