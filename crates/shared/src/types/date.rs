//! Calendar helpers and lenient date parsing.

use chrono::{Datelike, NaiveDate};

/// Formats tried, in order, when parsing user-entered dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y"];

/// Parses a user-entered date. Blank or unrecognised text yields `None`.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// First day of `date`'s month.
#[must_use]
pub fn beginning_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of `date`'s month.
#[must_use]
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    last_day_of_month(date.year(), date.month()).unwrap_or(date)
}

/// Last day of the given month, or `None` outside chrono's range.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year.checked_add(1)?, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Returns true if `date` is the last day of its month.
#[must_use]
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    end_of_month(date) == date
}
