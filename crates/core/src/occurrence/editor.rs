//! Applying occurrence edits to recurring items.
//!
//! Every changed field runs through its handler in a fixed order: date,
//! name, schedule, starts_on, ends_on, amount. A handler either rejects the
//! change, mutates the item in place, or splits the series so that a new
//! item takes over from the edited occurrence. The collected outcomes are
//! committed inside a single store transaction.

use chrono::NaiveDate;
use spendful_shared::FieldErrors;
use tracing::{debug, info, warn};

use super::error::OccurrenceError;
use super::types::{ChangeSet, DateEntry, Occurrence};
use crate::item::{ItemError, ItemService, NewItem, RecurringItem};
use crate::recurrence::Schedule;
use crate::store::{Store, StoreError, TransactionQuery, atomically};
use crate::transaction::Transaction;

const DATE_TAKEN: &str = "cannot be changed to a date on which an occurrence already exists";
const LATER_TRANSACTIONS: &str = "cannot be changed when transactions exist after this occurrence";
const INVALID_DATE: &str = "must be a valid date";
const HAS_TRANSACTIONS: &str = "cannot be changed when transactions exist";
const TRANSACTIONS_AFTER_END: &str = "cannot be changed when transactions exist after the new date";

/// An in-place change to the edited item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Rename the series.
    SetName(String),
    /// Replace the schedule.
    SetSchedule(Schedule),
    /// Move the series start.
    SetStartsOn(NaiveDate),
    /// Move or clear the series end.
    SetEndsOn(Option<NaiveDate>),
    /// Replace the amount.
    SetAmount(i64),
    /// Add a date outside the rule.
    AddExtraDate(NaiveDate),
    /// Remove a date from the series.
    AddException(NaiveDate),
    /// Move the occurrence itself; its transactions follow on commit.
    RetargetOccurrence(NaiveDate),
}

/// How the original item gives way to a split-off item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Start the original at this later date.
    AdvanceStartsOn(NaiveDate),
    /// Drop this date from the original.
    AddException(NaiveDate),
    /// End the original on this date.
    EndOn(NaiveDate),
    /// Reduce the original to its first occurrence.
    CollapseToOnce,
}

/// Field overrides for a split-off item; everything else is copied from the original.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitItem {
    /// Schedule of the new item.
    pub schedule: Option<Schedule>,
    /// Start of the new item.
    pub starts_on: Option<NaiveDate>,
    /// Amount of the new item.
    pub amount: Option<i64>,
}

impl SplitItem {
    /// A single occurrence on `date`.
    #[must_use]
    pub const fn once_on(date: NaiveDate) -> Self {
        Self {
            schedule: Some(Schedule::Once),
            starts_on: Some(date),
            amount: None,
        }
    }

    /// Takes every override set on `later`.
    fn merge(&mut self, later: Self) {
        self.schedule = later.schedule.or(self.schedule);
        self.starts_on = later.starts_on.or(self.starts_on);
        self.amount = later.amount.or(self.amount);
    }
}

/// Result of one field handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The field did not change.
    NoOp,
    /// Apply the mutations to the item.
    MutateInPlace(Vec<Mutation>),
    /// Create a new item from the edited occurrence and cut back the original.
    Split {
        /// Overrides for the new item.
        new_item: SplitItem,
        /// Change to the original item.
        truncation: Truncation,
    },
}

/// A refused field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    /// Field the message belongs to.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: &'static str,
}

impl Rejection {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

type HandlerResult = Result<HandlerOutcome, Rejection>;
type Handler = fn(&Occurrence, &EditContext<'_>) -> HandlerResult;

/// Field handlers in the order they run.
const HANDLERS: [Handler; 6] = [
    EditEngine::date_change,
    EditEngine::name_change,
    EditEngine::schedule_change,
    EditEngine::starts_on_change,
    EditEngine::ends_on_change,
    EditEngine::amount_change,
];

/// The persisted item as it was when the save began.
struct EditContext<'a> {
    item: &'a RecurringItem,
    normal: &'a [Transaction],
    ordinal: usize,
    second: Option<NaiveDate>,
}

impl<'a> EditContext<'a> {
    fn new(item: &'a RecurringItem, normal: &'a [Transaction], occurrence: &Occurrence) -> Self {
        Self {
            item,
            normal,
            ordinal: occurrence.ordinal_in(item),
            second: item.recurrence().first(2).get(1).copied(),
        }
    }

    const fn is_first(&self) -> bool {
        self.ordinal == 1
    }

    fn has_transactions_after(&self, date: NaiveDate) -> bool {
        self.normal
            .iter()
            .any(|txn| txn.occurrence.is_some_and(|occurrence| occurrence > date))
    }

    /// Ends the original just before the edited occurrence.
    fn truncate_before(&self) -> Truncation {
        let previous = self
            .ordinal
            .checked_sub(1)
            .and_then(|n| self.item.occurrences().ordinal(n));
        match previous {
            Some(previous) if self.ordinal > 2 => Truncation::EndOn(previous.date()),
            _ => Truncation::CollapseToOnce,
        }
    }
}

/// The field handlers. Each inspects one pending change against the original item.
struct EditEngine;

impl EditEngine {
    /// Moves the occurrence to another date.
    ///
    /// # Returns
    /// * in-place start move for once items
    /// * an extra date when the new date stays within the series
    /// * a split into a new once item otherwise
    fn date_change(occurrence: &Occurrence, ctx: &EditContext<'_>) -> HandlerResult {
        let Some(date) = occurrence.changes.date else {
            return Ok(HandlerOutcome::NoOp);
        };
        if ctx.item.occurrences().exists(date) {
            return Err(Rejection::new("date", DATE_TAKEN));
        }

        if ctx.item.is_once() {
            return Ok(HandlerOutcome::MutateInPlace(vec![Mutation::SetStartsOn(date)]));
        }

        let Some(second) = ctx.second else {
            return Ok(HandlerOutcome::MutateInPlace(vec![
                Mutation::SetSchedule(Schedule::Once),
                Mutation::SetStartsOn(date),
                Mutation::SetEndsOn(None),
            ]));
        };

        let window_end = ctx.item.ends_on.unwrap_or(date);
        let inside = (ctx.item.starts_on..=window_end).contains(&date);
        let date_was = occurrence.date_was();

        if ctx.is_first() {
            if inside && date > second {
                // the old first date falls away with the start; it gets no exception
                return Ok(HandlerOutcome::MutateInPlace(vec![
                    Mutation::AddExtraDate(date),
                    Mutation::SetStartsOn(second),
                ]));
            }
            return Ok(HandlerOutcome::Split {
                new_item: SplitItem::once_on(date),
                truncation: Truncation::AdvanceStartsOn(second),
            });
        }

        if inside {
            Ok(HandlerOutcome::MutateInPlace(vec![
                Mutation::AddExtraDate(date),
                Mutation::AddException(date_was),
            ]))
        } else {
            Ok(HandlerOutcome::Split {
                new_item: SplitItem::once_on(date),
                truncation: Truncation::AddException(date_was),
            })
        }
    }

    fn name_change(occurrence: &Occurrence, _ctx: &EditContext<'_>) -> HandlerResult {
        Ok(occurrence
            .changes
            .name
            .clone()
            .map_or(HandlerOutcome::NoOp, |name| HandlerOutcome::MutateInPlace(vec![Mutation::SetName(name)])))
    }

    fn schedule_change(occurrence: &Occurrence, ctx: &EditContext<'_>) -> HandlerResult {
        let Some(schedule) = occurrence.changes.schedule else {
            return Ok(HandlerOutcome::NoOp);
        };
        if ctx.has_transactions_after(occurrence.date()) {
            return Err(Rejection::new("schedule", LATER_TRANSACTIONS));
        }

        if ctx.item.is_once() || ctx.is_first() {
            return Ok(HandlerOutcome::MutateInPlace(vec![Mutation::SetSchedule(schedule)]));
        }
        Ok(HandlerOutcome::Split {
            new_item: SplitItem {
                schedule: Some(schedule),
                starts_on: Some(occurrence.date()),
                amount: None,
            },
            truncation: ctx.truncate_before(),
        })
    }

    fn starts_on_change(occurrence: &Occurrence, ctx: &EditContext<'_>) -> HandlerResult {
        let Some(entry) = &occurrence.changes.starts_on else {
            return Ok(HandlerOutcome::NoOp);
        };
        let DateEntry::Date(starts_on) = *entry else {
            return Err(Rejection::new("starts_on", INVALID_DATE));
        };

        let once = occurrence.schedule().is_once();
        if !once && !ctx.normal.is_empty() {
            return Err(Rejection::new("starts_on", HAS_TRANSACTIONS));
        }

        let mut mutations = vec![Mutation::SetStartsOn(starts_on)];
        if once {
            mutations.push(Mutation::RetargetOccurrence(starts_on));
        }
        if occurrence.ends_on() == Some(starts_on) {
            mutations.push(Mutation::SetSchedule(Schedule::Once));
        }
        Ok(HandlerOutcome::MutateInPlace(mutations))
    }

    fn ends_on_change(occurrence: &Occurrence, ctx: &EditContext<'_>) -> HandlerResult {
        let ends_on = match &occurrence.changes.ends_on {
            None => return Ok(HandlerOutcome::NoOp),
            Some(DateEntry::Blank) => return Ok(HandlerOutcome::MutateInPlace(vec![Mutation::SetEndsOn(None)])),
            Some(DateEntry::Invalid(_)) => return Err(Rejection::new("ends_on", INVALID_DATE)),
            Some(DateEntry::Date(date)) => *date,
        };
        if ctx.has_transactions_after(ends_on) {
            return Err(Rejection::new("ends_on", TRANSACTIONS_AFTER_END));
        }

        let mut mutations = vec![Mutation::SetEndsOn(Some(ends_on))];
        if ends_on == occurrence.starts_on() {
            mutations.push(Mutation::SetSchedule(Schedule::Once));
        }
        Ok(HandlerOutcome::MutateInPlace(mutations))
    }

    fn amount_change(occurrence: &Occurrence, ctx: &EditContext<'_>) -> HandlerResult {
        let Some(amount) = occurrence.changes.amount else {
            return Ok(HandlerOutcome::NoOp);
        };
        if ctx.has_transactions_after(occurrence.date()) {
            return Err(Rejection::new("amount", LATER_TRANSACTIONS));
        }

        if occurrence.schedule().is_once() || ctx.is_first() {
            return Ok(HandlerOutcome::MutateInPlace(vec![Mutation::SetAmount(amount)]));
        }
        Ok(HandlerOutcome::Split {
            new_item: SplitItem {
                schedule: None,
                starts_on: Some(occurrence.date()),
                amount: Some(amount),
            },
            truncation: ctx.truncate_before(),
        })
    }
}

/// A split waiting to be committed: the original as it was when the split
/// was decided plus the overrides of every split handler.
#[derive(Debug, Clone)]
struct PendingSplit {
    base: RecurringItem,
    overrides: SplitItem,
}

impl PendingSplit {
    fn build(&self, name: &str) -> RecurringItem {
        let base = &self.base;
        NewItem {
            budget_id: base.budget_id,
            category: base.category,
            name: name.to_string(),
            amount: self.overrides.amount.unwrap_or(base.amount),
            schedule: Some(self.overrides.schedule.unwrap_or(base.schedule)),
            starts_on: self.overrides.starts_on.unwrap_or(base.starts_on),
            ends_on: base.ends_on,
        }
        .into_item()
    }
}

/// Handler outcomes folded into a working copy of the item.
#[derive(Debug, Clone)]
struct EditPlan {
    item: RecurringItem,
    split: Option<PendingSplit>,
    retarget: Option<NaiveDate>,
}

impl EditPlan {
    fn new(original: &RecurringItem) -> Self {
        Self {
            item: original.clone(),
            split: None,
            retarget: None,
        }
    }

    fn apply(&mut self, outcome: HandlerOutcome) {
        match outcome {
            HandlerOutcome::NoOp => {}
            HandlerOutcome::MutateInPlace(mutations) => {
                for mutation in mutations {
                    self.mutate(mutation);
                }
            }
            HandlerOutcome::Split { new_item, truncation } => {
                match &mut self.split {
                    Some(pending) => pending.overrides.merge(new_item),
                    None => {
                        self.split = Some(PendingSplit {
                            base: self.item.clone(),
                            overrides: new_item,
                        });
                    }
                }
                self.truncate(truncation);
            }
        }
    }

    fn mutate(&mut self, mutation: Mutation) {
        let item = &mut self.item;
        match mutation {
            Mutation::SetName(name) => item.name = name,
            Mutation::SetSchedule(schedule) => item.schedule = schedule,
            Mutation::SetStartsOn(date) => item.starts_on = date,
            Mutation::SetEndsOn(date) => item.ends_on = date,
            Mutation::SetAmount(amount) => item.amount = amount,
            Mutation::AddExtraDate(date) => item.recurrence.add_extra_date(date),
            Mutation::AddException(date) => item.recurrence.add_exception(date),
            Mutation::RetargetOccurrence(date) => self.retarget = Some(date),
        }
    }

    fn truncate(&mut self, truncation: Truncation) {
        let item = &mut self.item;
        match truncation {
            Truncation::AdvanceStartsOn(date) => advance_start(item, date),
            Truncation::AddException(date) => item.recurrence.add_exception(date),
            Truncation::EndOn(date) => item.ends_on = Some(date),
            Truncation::CollapseToOnce => item.schedule = Schedule::Once,
        }
    }
}

/// Starts `item` on `date`; a start that meets the end leaves a single occurrence.
fn advance_start(item: &mut RecurringItem, date: NaiveDate) {
    item.starts_on = date;
    if item.ends_on == Some(date) {
        item.schedule = Schedule::Once;
    }
}

/// Why a commit was abandoned.
#[derive(Debug)]
enum CommitError {
    /// An item failed validation.
    Rejected(FieldErrors),
    /// The store failed.
    Store(StoreError),
}

impl From<StoreError> for CommitError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ItemError> for CommitError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Invalid(errors) => Self::Rejected(errors),
            ItemError::Store(err) => Self::Store(err),
            ItemError::NotFound(id) => Self::Store(StoreError::not_found("item", id)),
        }
    }
}

impl Occurrence {
    /// Proposes `changes` and saves them.
    ///
    /// # Errors
    ///
    /// See [`Occurrence::save`].
    pub fn update<S: Store + ?Sized>(&mut self, store: &mut S, changes: ChangeSet) -> Result<bool, OccurrenceError> {
        self.assign(changes);
        self.save(store)
    }

    /// Applies the pending changes to the item.
    ///
    /// Returns `Ok(true)` when the changes were committed (or there were
    /// none) and `Ok(false)` when a change was rejected; the reasons are in
    /// [`Occurrence::errors`]. Either failure discards every pending value
    /// and leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item is gone, or a store error if the
    /// commit failed; the commit is rolled back.
    pub fn save<S: Store + ?Sized>(&mut self, store: &mut S) -> Result<bool, OccurrenceError> {
        self.errors.clear();
        if !self.is_changed() {
            return Ok(true);
        }

        let original = store
            .item(self.item_id)?
            .ok_or(OccurrenceError::ItemNotFound(self.item_id))?;
        let normal = store.transactions(&TransactionQuery::for_item(original.id).normal())?;
        let ctx = EditContext::new(&original, &normal, self);

        let mut plan = EditPlan::new(&original);
        for handler in HANDLERS {
            match handler(self, &ctx) {
                Ok(outcome) => {
                    debug!(item_id = %original.id, date = %self.date, outcome = ?outcome, "occurrence change planned");
                    plan.apply(outcome);
                }
                Err(rejection) => {
                    debug!(item_id = %original.id, field = rejection.field, "occurrence change rejected");
                    self.errors.add(rejection.field, rejection.message);
                }
            }
            if let Some(date) = plan.retarget.take() {
                self.set_date(date);
            }
        }

        if !self.errors.is_empty() {
            self.discard_changes();
            return Ok(false);
        }

        match self.commit(store, &original, &plan) {
            Ok(item) => {
                self.accept_changes(&item);
                Ok(true)
            }
            Err(CommitError::Rejected(errors)) => {
                warn!(item_id = %original.id, errors = %errors, "occurrence edit rolled back");
                self.errors.merge(errors);
                self.discard_changes();
                Ok(false)
            }
            Err(CommitError::Store(err)) => {
                warn!(item_id = %original.id, error = %err, "occurrence edit rolled back");
                self.discard_changes();
                Err(err.into())
            }
        }
    }

    /// Writes the plan: re-pointed transactions, the split-off item, moved
    /// transactions and finally the original item. Returns the item, as
    /// saved, that the occurrence belongs to afterwards.
    fn commit<S: Store + ?Sized>(
        &self,
        store: &mut S,
        original: &RecurringItem,
        plan: &EditPlan,
    ) -> Result<RecurringItem, CommitError> {
        let date_was = self.date;
        let date = self.date();
        let on_old_date = TransactionQuery::for_item(original.id).on_occurrence(date_was);

        atomically(store, |s| -> Result<RecurringItem, CommitError> {
            if date != date_was && plan.split.is_none() {
                for mut txn in s.transactions(&on_old_date)? {
                    txn.occurrence = Some(date);
                    s.update_transaction(&txn)?;
                }
            }

            let mut split_off = None;
            if let Some(split) = &plan.split {
                let mut new_item = split.build(&plan.item.name);
                ItemService::save(s, &mut new_item)?;

                for mut txn in s.transactions(&on_old_date)? {
                    txn.item_id = Some(new_item.id);
                    txn.occurrence = Some(date);
                    s.update_transaction(&txn)?;
                }
                // amount_change already refused the edit if any later occurrence
                // had transactions, so this finds none
                if self.changes.amount.is_some() {
                    let later = TransactionQuery::for_item(original.id).occurrence_after(date);
                    for mut txn in s.transactions(&later)? {
                        txn.item_id = Some(new_item.id);
                        s.update_transaction(&txn)?;
                    }
                }

                info!(item_id = %original.id, new_item_id = %new_item.id, date = %date, "item split");
                split_off = Some(new_item);
            }

            let mut item = plan.item.clone();
            if item != *original {
                ItemService::save(s, &mut item)?;
            }
            Ok(split_off.unwrap_or(item))
        })
    }

    /// Deletes this occurrence.
    ///
    /// A once item is deleted outright. Otherwise the occurrence is cut
    /// from the series: the first occurrence by moving the start to the
    /// second, any other by an exception date. Transactions on the
    /// occurrence are orphaned, never deleted.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item is gone, or the error that
    /// aborted the deletion; nothing is written in that case.
    pub fn destroy<S: Store + ?Sized>(self, store: &mut S) -> Result<(), OccurrenceError> {
        let mut item = store
            .item(self.item_id)?
            .ok_or(OccurrenceError::ItemNotFound(self.item_id))?;

        if item.is_once() {
            ItemService::destroy(store, item.id)?;
            return Ok(());
        }

        let ordinal = self.ordinal_in(&item);
        let second = item.occurrences().ordinal(2).map(|occurrence| occurrence.date());

        atomically(store, |s| -> Result<(), OccurrenceError> {
            for mut txn in self.transactions(&*s)? {
                txn.occurrence = None;
                s.update_transaction(&txn)?;
            }

            if ordinal == 1 {
                let Some(second) = second else {
                    ItemService::destroy(s, item.id)?;
                    return Ok(());
                };
                advance_start(&mut item, second);
            } else {
                item.recurrence.add_exception(self.date);
            }
            ItemService::save(s, &mut item)?;
            Ok(())
        })?;

        info!(item_id = %self.item_id, date = %self.date, "occurrence deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;
    use spendful_shared::types::{BudgetId, TransactionId};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly() -> RecurringItem {
        NewItem {
            budget_id: BudgetId::new(),
            category: Category::Expense,
            name: "Groceries".into(),
            amount: 8_000,
            schedule: Some(Schedule::Weekly),
            starts_on: ymd(2024, 1, 1),
            ends_on: Some(ymd(2024, 2, 5)),
        }
        .into_item()
    }

    fn normal_txn(item: &RecurringItem, occurrence: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            budget_id: item.budget_id,
            item_id: Some(item.id),
            occurrence: Some(occurrence),
            category: None,
            date: occurrence,
            amount: item.amount,
            description: None,
        }
    }

    fn plan(item: &RecurringItem, normal: &[Transaction], date: NaiveDate, changes: ChangeSet) -> Vec<HandlerResult> {
        let mut occurrence = Occurrence::new(item, date);
        occurrence.assign(changes);
        let ctx = EditContext::new(item, normal, &occurrence);
        HANDLERS.iter().map(|handler| handler(&occurrence, &ctx)).collect()
    }

    fn outcome(results: &[HandlerResult], index: usize) -> HandlerOutcome {
        results[index].clone().unwrap()
    }

    #[test]
    fn test_unchanged_fields_are_no_ops() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 15), ChangeSet::new());
        assert!(results.iter().all(|r| *r == Ok(HandlerOutcome::NoOp)));
    }

    #[test]
    fn test_date_onto_existing_occurrence_rejected() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 15), ChangeSet::new().date(ymd(2024, 1, 22)));
        assert_eq!(results[0], Err(Rejection::new("date", DATE_TAKEN)));
    }

    #[test]
    fn test_first_date_before_second_splits_once_item() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().date(ymd(2024, 1, 3)));
        assert_eq!(
            outcome(&results, 0),
            HandlerOutcome::Split {
                new_item: SplitItem::once_on(ymd(2024, 1, 3)),
                truncation: Truncation::AdvanceStartsOn(ymd(2024, 1, 8)),
            }
        );
    }

    #[test]
    fn test_first_date_after_second_adds_extra_without_exception() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().date(ymd(2024, 1, 10)));
        assert_eq!(
            outcome(&results, 0),
            HandlerOutcome::MutateInPlace(vec![
                Mutation::AddExtraDate(ymd(2024, 1, 10)),
                Mutation::SetStartsOn(ymd(2024, 1, 8)),
            ])
        );
    }

    #[test]
    fn test_later_date_inside_window_stays_on_item() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 15), ChangeSet::new().date(ymd(2024, 1, 17)));
        assert_eq!(
            outcome(&results, 0),
            HandlerOutcome::MutateInPlace(vec![
                Mutation::AddExtraDate(ymd(2024, 1, 17)),
                Mutation::AddException(ymd(2024, 1, 15)),
            ])
        );

        let outside = plan(&item, &[], ymd(2024, 1, 15), ChangeSet::new().date(ymd(2024, 3, 1)));
        assert_eq!(
            outcome(&outside, 0),
            HandlerOutcome::Split {
                new_item: SplitItem::once_on(ymd(2024, 3, 1)),
                truncation: Truncation::AddException(ymd(2024, 1, 15)),
            }
        );
    }

    #[test]
    fn test_amount_split_truncates_before_occurrence() {
        let item = weekly();
        let third = plan(&item, &[], ymd(2024, 1, 15), ChangeSet::new().amount(9_000));
        assert_eq!(
            outcome(&third, 5),
            HandlerOutcome::Split {
                new_item: SplitItem {
                    schedule: None,
                    starts_on: Some(ymd(2024, 1, 15)),
                    amount: Some(9_000),
                },
                truncation: Truncation::EndOn(ymd(2024, 1, 8)),
            }
        );

        let second = plan(&item, &[], ymd(2024, 1, 8), ChangeSet::new().amount(9_000));
        assert!(matches!(
            outcome(&second, 5),
            HandlerOutcome::Split {
                truncation: Truncation::CollapseToOnce,
                ..
            }
        ));

        let first = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().amount(9_000));
        assert_eq!(outcome(&first, 5), HandlerOutcome::MutateInPlace(vec![Mutation::SetAmount(9_000)]));
    }

    #[test]
    fn test_later_transactions_block_schedule_and_amount() {
        let item = weekly();
        let normal = [normal_txn(&item, ymd(2024, 1, 22))];
        let results = plan(
            &item,
            &normal,
            ymd(2024, 1, 15),
            ChangeSet::new().schedule(Schedule::Monthly).amount(1),
        );
        assert_eq!(results[2], Err(Rejection::new("schedule", LATER_TRANSACTIONS)));
        assert_eq!(results[5], Err(Rejection::new("amount", LATER_TRANSACTIONS)));
    }

    #[test]
    fn test_starts_on_and_ends_on_entries() {
        let item = weekly();
        let results = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().starts_on_text("soon").ends_on_text("never"));
        assert_eq!(results[3], Err(Rejection::new("starts_on", INVALID_DATE)));
        assert_eq!(results[4], Err(Rejection::new("ends_on", INVALID_DATE)));

        let cleared = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().ends_on_text(""));
        assert_eq!(outcome(&cleared, 4), HandlerOutcome::MutateInPlace(vec![Mutation::SetEndsOn(None)]));

        let collapsed = plan(&item, &[], ymd(2024, 1, 1), ChangeSet::new().ends_on(ymd(2024, 1, 1)));
        assert_eq!(
            outcome(&collapsed, 4),
            HandlerOutcome::MutateInPlace(vec![
                Mutation::SetEndsOn(Some(ymd(2024, 1, 1))),
                Mutation::SetSchedule(Schedule::Once),
            ])
        );

        let normal = [normal_txn(&item, ymd(2024, 1, 1))];
        let blocked = plan(&item, &normal, ymd(2024, 1, 1), ChangeSet::new().starts_on(ymd(2023, 12, 25)));
        assert_eq!(blocked[3], Err(Rejection::new("starts_on", HAS_TRANSACTIONS)));
    }

    #[test]
    fn test_advancing_start_onto_end_collapses_to_once() {
        let mut plan = EditPlan::new(&weekly());
        plan.truncate(Truncation::AdvanceStartsOn(ymd(2024, 1, 8)));
        assert_eq!(plan.item.schedule, Schedule::Weekly);

        let mut short = weekly();
        short.ends_on = Some(ymd(2024, 1, 8));
        let mut plan = EditPlan::new(&short);
        plan.truncate(Truncation::AdvanceStartsOn(ymd(2024, 1, 8)));
        assert_eq!(plan.item.starts_on, ymd(2024, 1, 8));
        assert_eq!(plan.item.schedule, Schedule::Once);
    }

    #[test]
    fn test_split_overrides_merge() {
        let mut plan = EditPlan::new(&weekly());
        plan.apply(HandlerOutcome::Split {
            new_item: SplitItem::once_on(ymd(2024, 3, 1)),
            truncation: Truncation::AddException(ymd(2024, 1, 15)),
        });
        plan.apply(HandlerOutcome::Split {
            new_item: SplitItem {
                schedule: None,
                starts_on: Some(ymd(2024, 3, 1)),
                amount: Some(1),
            },
            truncation: Truncation::EndOn(ymd(2024, 1, 8)),
        });

        let split = plan.split.unwrap();
        assert_eq!(
            split.overrides,
            SplitItem {
                schedule: Some(Schedule::Once),
                starts_on: Some(ymd(2024, 3, 1)),
                amount: Some(1),
            }
        );
        assert_eq!(plan.item.ends_on, Some(ymd(2024, 1, 8)));
        assert!(plan.item.recurrence.exception_dates.contains(&ymd(2024, 1, 15)));
    }
}
