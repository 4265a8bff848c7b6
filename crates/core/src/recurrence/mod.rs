//! Recurrence calculation.
//!
//! Turns a start date, an optional end date and a schedule rule (plus
//! explicit exception and extra dates) into the ordered dates of a series.

pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::{Dates, Recurrence};
pub use error::RecurrenceError;
pub use types::{MonthDay, RecurrenceRule, RecurrenceState, Schedule};
