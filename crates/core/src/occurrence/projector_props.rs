//! Property-based tests for the occurrence projector.
//!
//! - Occurrences within the series window are ordered and bounded
//! - `exists` agrees with a single-day `between`
//! - `ordinal(n)` is the last of `limit(n)`

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use spendful_shared::types::BudgetId;

use crate::item::{Category, NewItem, RecurringItem};
use crate::recurrence::Schedule;

/// Strategy to generate repeating schedules.
fn repeating_schedule() -> impl Strategy<Value = Schedule> {
    prop_oneof![
        Just(Schedule::Weekly),
        Just(Schedule::Fortnightly),
        Just(Schedule::Monthly),
        Just(Schedule::Yearly),
    ]
}

/// Strategy to generate a start date between 2000 and roughly 2030.
fn start_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..11_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().checked_add_days(Days::new(offset)).unwrap()
    })
}

/// Helper to create an item with a bounded window.
fn make_item(schedule: Schedule, starts_on: NaiveDate, span: u64) -> RecurringItem {
    NewItem {
        budget_id: BudgetId::new(),
        category: Category::Expense,
        name: "Rent".into(),
        amount: 1_000,
        schedule: Some(schedule),
        starts_on,
        ends_on: starts_on.checked_add_days(Days::new(span)),
    }
    .into_item()
}

proptest! {
    #[test]
    fn prop_between_is_ordered_and_bounded(
        schedule in repeating_schedule(),
        starts_on in start_date(),
        span in 1u64..1_500,
    ) {
        let item = make_item(schedule, starts_on, span);
        let ends_on = item.ends_on.unwrap();
        let dates: Vec<NaiveDate> = item
            .occurrences()
            .between(item.starts_on, ends_on)
            .iter()
            .map(|o| o.date())
            .collect();

        prop_assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(dates.iter().all(|d| *d >= starts_on && *d <= ends_on));
        prop_assert_eq!(dates.first().copied(), Some(starts_on));
    }

    #[test]
    fn prop_exists_matches_single_day_between(
        schedule in repeating_schedule(),
        starts_on in start_date(),
        probe in 0u64..800,
    ) {
        let item = make_item(schedule, starts_on, 700);
        let date = starts_on.checked_add_days(Days::new(probe)).unwrap();
        let single = item.occurrences().between(date, date);

        prop_assert_eq!(item.occurrences().exists(date), single.iter().any(|o| o.date() == date));
    }

    #[test]
    fn prop_ordinal_is_last_of_limit(
        schedule in repeating_schedule(),
        starts_on in start_date(),
        n in 1usize..20,
    ) {
        let item = make_item(schedule, starts_on, 365 * 3);
        let limited = item.occurrences().limit(n);
        let nth = item.occurrences().ordinal(n);

        if limited.len() == n {
            prop_assert_eq!(nth.map(|o| o.date()), limited.last().map(|o| o.date()));
        } else {
            prop_assert!(nth.is_none());
        }
    }
}
