//! Expands a recurrence state into concrete dates.
//!
//! Dates are produced lazily and in ascending order by merging the rule's
//! dates with the explicit extra dates, dropping duplicates and exceptions,
//! and stopping at the series end.

use std::collections::btree_set;
use std::collections::{BTreeSet, VecDeque};
use std::iter::Peekable;

use chrono::{Datelike, Days, NaiveDate};
use spendful_shared::types::last_day_of_month;

use super::error::RecurrenceError;
use super::types::{MonthDay, RecurrenceRule, RecurrenceState};

/// A recurrence bound to its series window.
#[derive(Debug, Clone, Copy)]
pub struct Recurrence<'a> {
    state: &'a RecurrenceState,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
}

impl<'a> Recurrence<'a> {
    /// Binds `state` to the window `[starts_on, ends_on]`.
    #[must_use]
    pub const fn new(state: &'a RecurrenceState, starts_on: NaiveDate, ends_on: Option<NaiveDate>) -> Self {
        Self {
            state,
            starts_on,
            ends_on,
        }
    }

    /// All dates of the series in ascending order. Unbounded when there is no end date.
    #[must_use]
    pub fn iter(&self) -> Dates<'a> {
        Dates {
            rule: RuleDates::new(self.state.rule, self.starts_on).peekable(),
            extras: self.state.extra_dates.range(self.starts_on..).peekable(),
            exceptions: &self.state.exception_dates,
            ends_on: self.ends_on,
            last: None,
            done: false,
        }
    }

    /// Dates within `[start, end]`, inclusive.
    #[must_use]
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.iter()
            .take_while(|date| *date <= end)
            .filter(|date| *date >= start)
            .collect()
    }

    /// The first `n` dates. Works without an end date.
    #[must_use]
    pub fn first(&self, n: usize) -> Vec<NaiveDate> {
        self.iter().take(n).collect()
    }

    /// Every date of the series.
    ///
    /// # Errors
    ///
    /// Returns `NoEndDate` if the series is unbounded.
    pub fn all(&self) -> Result<Vec<NaiveDate>, RecurrenceError> {
        if self.ends_on.is_none() {
            return Err(RecurrenceError::NoEndDate);
        }
        Ok(self.iter().collect())
    }

    /// Returns true if the series produces `date`.
    #[must_use]
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.iter().take_while(|d| *d <= date).any(|d| d == date)
    }

    /// Number of dates within `[start, end]`.
    #[must_use]
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.iter()
            .take_while(|date| *date <= end)
            .filter(|date| *date >= start)
            .count()
    }
}

/// Iterator over the dates of a [`Recurrence`].
#[derive(Debug)]
pub struct Dates<'a> {
    rule: Peekable<RuleDates>,
    extras: Peekable<btree_set::Range<'a, NaiveDate>>,
    exceptions: &'a BTreeSet<NaiveDate>,
    ends_on: Option<NaiveDate>,
    last: Option<NaiveDate>,
    done: bool,
}

impl Iterator for Dates<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.done {
            let next = match (self.rule.peek().copied(), self.extras.peek().map(|d| **d)) {
                (None, None) => None,
                (Some(rule), None) => self.rule.next().map(|_| rule),
                (None, Some(extra)) => self.extras.next().map(|_| extra),
                (Some(rule), Some(extra)) if rule <= extra => self.rule.next().map(|_| rule),
                (Some(_), Some(extra)) => self.extras.next().map(|_| extra),
            };

            let Some(date) = next else {
                self.done = true;
                break;
            };
            if self.ends_on.is_some_and(|end| date > end) {
                self.done = true;
                break;
            }
            if self.last == Some(date) {
                continue;
            }
            self.last = Some(date);
            if self.exceptions.contains(&date) {
                continue;
            }
            return Some(date);
        }
        None
    }
}

/// Raw rule dates from the anchor onwards, ignoring extras, exceptions and the end date.
#[derive(Debug, Clone)]
struct RuleDates {
    rule: RecurrenceRule,
    anchor: NaiveDate,
    period: u32,
    buffer: VecDeque<NaiveDate>,
    exhausted: bool,
}

impl RuleDates {
    fn new(rule: RecurrenceRule, anchor: NaiveDate) -> Self {
        Self {
            rule,
            anchor,
            period: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Candidate dates of the `period`-th step. `None` once the calendar runs out.
    fn candidates(&self, period: u32) -> Option<Vec<NaiveDate>> {
        match self.rule {
            RecurrenceRule::Once => (period == 0).then(|| vec![self.anchor]),
            RecurrenceRule::Weekly => self.every_days(period, 7),
            RecurrenceRule::Fortnightly => self.every_days(period, 14),
            RecurrenceRule::Yearly => {
                let year = self.anchor.year().checked_add(i32::try_from(period).ok()?)?;
                if year > NaiveDate::MAX.year() {
                    return None;
                }
                Some(
                    NaiveDate::from_ymd_opt(year, self.anchor.month(), self.anchor.day())
                        .into_iter()
                        .collect(),
                )
            }
            RecurrenceRule::Monthly {
                day,
                february_fallback,
            } => {
                let months = i32::try_from(self.anchor.month0()).ok()?.checked_add(i32::try_from(period).ok()?)?;
                let year = self.anchor.year().checked_add(months / 12)?;
                let month = u32::try_from(months % 12).ok()? + 1;
                if year > NaiveDate::MAX.year() {
                    return None;
                }

                let mut dates = Vec::with_capacity(2);
                let primary = match day {
                    MonthDay::Fixed(d) => NaiveDate::from_ymd_opt(year, month, d),
                    MonthDay::Last => last_day_of_month(year, month),
                };
                dates.extend(primary);
                if february_fallback && month == 2 {
                    dates.extend(last_day_of_month(year, 2));
                }
                dates.sort_unstable();
                dates.dedup();
                dates.retain(|date| *date >= self.anchor);
                Some(dates)
            }
        }
    }

    fn every_days(&self, period: u32, step: u64) -> Option<Vec<NaiveDate>> {
        let offset = u64::from(period).checked_mul(step)?;
        self.anchor.checked_add_days(Days::new(offset)).map(|date| vec![date])
    }
}

impl Iterator for RuleDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while self.buffer.is_empty() {
            if self.exhausted {
                return None;
            }
            match self.candidates(self.period) {
                Some(dates) => self.buffer.extend(dates),
                None => self.exhausted = true,
            }
            match self.period.checked_add(1) {
                Some(next) => self.period = next,
                None => self.exhausted = true,
            }
        }
        self.buffer.pop_front()
    }
}
