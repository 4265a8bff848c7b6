//! Schedule kinds and the persisted recurrence state.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use spendful_shared::types::is_last_day_of_month;

/// How often a recurring item repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// A single occurrence on `starts_on`.
    #[default]
    Once,
    /// Every 7 days.
    Weekly,
    /// Every 14 days.
    Fortnightly,
    /// Same day of every month.
    Monthly,
    /// Same month and day every year.
    Yearly,
}

impl Schedule {
    /// Every schedule kind, in display order.
    pub const ALL: [Self; 5] = [
        Self::Once,
        Self::Weekly,
        Self::Fortnightly,
        Self::Monthly,
        Self::Yearly,
    ];

    /// Returns the string representation of the schedule.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a schedule from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "once" => Some(Self::Once),
            "weekly" => Some(Self::Weekly),
            "fortnightly" | "biweekly" => Some(Self::Fortnightly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns true for the single-occurrence schedule.
    #[must_use]
    pub const fn is_once(&self) -> bool {
        matches!(self, Self::Once)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day-of-month selector for monthly rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthDay {
    /// A fixed day number; months without that day are skipped.
    Fixed(u32),
    /// The last day of every month.
    Last,
}

/// The generating rule of a series, fixed when the item is created or its schedule changes.
///
/// Weekly, fortnightly and yearly rules count from the item's current `starts_on`.
/// Monthly rules remember the day they were built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// Only `starts_on`.
    Once,
    /// Every 7 days from `starts_on`.
    Weekly,
    /// Every 14 days from `starts_on`.
    Fortnightly,
    /// A day of every month.
    Monthly {
        /// Which day of the month.
        day: MonthDay,
        /// Also recur on the last day of February, so a 29th/30th/31st series
        /// is not silent in February.
        february_fallback: bool,
    },
    /// Same month and day as `starts_on`; Feb 29 only recurs in leap years.
    Yearly,
}

impl RecurrenceRule {
    /// Builds the rule for `schedule` anchored at `starts_on`.
    #[must_use]
    pub fn build(schedule: Schedule, starts_on: NaiveDate) -> Self {
        match schedule {
            Schedule::Once => Self::Once,
            Schedule::Weekly => Self::Weekly,
            Schedule::Fortnightly => Self::Fortnightly,
            Schedule::Monthly => {
                let day = if is_last_day_of_month(starts_on) {
                    MonthDay::Last
                } else {
                    MonthDay::Fixed(starts_on.day())
                };
                Self::Monthly {
                    day,
                    february_fallback: starts_on.day() > 28,
                }
            }
            Schedule::Yearly => Self::Yearly,
        }
    }

    /// The schedule kind this rule implements.
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        match self {
            Self::Once => Schedule::Once,
            Self::Weekly => Schedule::Weekly,
            Self::Fortnightly => Schedule::Fortnightly,
            Self::Monthly { .. } => Schedule::Monthly,
            Self::Yearly => Schedule::Yearly,
        }
    }
}

/// Persisted recurrence data of an item: its rule plus per-date adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceState {
    /// The generating rule.
    pub rule: RecurrenceRule,
    /// Dates removed from the series.
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
    /// Dates added to the series outside the rule.
    #[serde(default)]
    pub extra_dates: BTreeSet<NaiveDate>,
}

impl RecurrenceState {
    /// Fresh state for `schedule` anchored at `starts_on`, with no adjustments.
    #[must_use]
    pub fn new(schedule: Schedule, starts_on: NaiveDate) -> Self {
        Self {
            rule: RecurrenceRule::build(schedule, starts_on),
            exception_dates: BTreeSet::new(),
            extra_dates: BTreeSet::new(),
        }
    }

    /// Excludes `date` from the series.
    pub fn add_exception(&mut self, date: NaiveDate) {
        self.exception_dates.insert(date);
    }

    /// Adds `date` to the series.
    pub fn add_extra_date(&mut self, date: NaiveDate) {
        self.extra_dates.insert(date);
    }

    /// Removes `date` from the extra dates, if present.
    pub fn remove_extra_date(&mut self, date: NaiveDate) {
        self.extra_dates.remove(&date);
    }

    /// Keeps the anchor date in the series after `starts_on` moved.
    pub fn move_anchor(&mut self, from: NaiveDate, to: NaiveDate) {
        self.remove_extra_date(from);
        self.add_extra_date(to);
    }
}
