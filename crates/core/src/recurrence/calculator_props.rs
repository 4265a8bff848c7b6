//! Property-based tests for the recurrence calculator.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use super::calculator::Recurrence;
use super::types::{RecurrenceState, Schedule};

/// Strategy for start dates between 2000 and 2040.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..14_600).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

fn arb_repeating_schedule() -> impl Strategy<Value = Schedule> {
    prop_oneof![
        Just(Schedule::Weekly),
        Just(Schedule::Fortnightly),
        Just(Schedule::Monthly),
        Just(Schedule::Yearly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// between() is strictly increasing and stays inside the series window.
    #[test]
    fn prop_between_is_ordered_and_bounded(
        schedule in arb_repeating_schedule(),
        starts_on in arb_date(),
        span in 1u64..1_500,
    ) {
        let ends_on = starts_on.checked_add_days(Days::new(span)).unwrap();
        let state = RecurrenceState::new(schedule, starts_on);
        let recurrence = Recurrence::new(&state, starts_on, Some(ends_on));

        let dates = recurrence.between(starts_on, ends_on);
        prop_assert_eq!(dates.first().copied(), Some(starts_on));
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(dates.iter().all(|d| *d >= starts_on && *d <= ends_on));
        prop_assert_eq!(&dates, &recurrence.all().unwrap());
    }

    /// occurs_on(d) agrees with between(d, d).
    #[test]
    fn prop_occurs_on_matches_point_window(
        schedule in arb_repeating_schedule(),
        starts_on in arb_date(),
        probe in 0u64..800,
        exception in 0u64..800,
    ) {
        let mut state = RecurrenceState::new(schedule, starts_on);
        state.add_exception(starts_on.checked_add_days(Days::new(exception)).unwrap());
        let recurrence = Recurrence::new(&state, starts_on, None);

        let date = starts_on.checked_add_days(Days::new(probe)).unwrap();
        prop_assert_eq!(recurrence.occurs_on(date), recurrence.between(date, date) == vec![date]);
    }

    /// first(n) is a prefix of a longer first(m).
    #[test]
    fn prop_first_is_prefix(
        schedule in arb_repeating_schedule(),
        starts_on in arb_date(),
        n in 0usize..20,
        extra in 0usize..10,
    ) {
        let state = RecurrenceState::new(schedule, starts_on);
        let recurrence = Recurrence::new(&state, starts_on, None);
        let short = recurrence.first(n);
        let long = recurrence.first(n + extra);
        prop_assert_eq!(short.len(), n);
        prop_assert_eq!(&long[..n], &short[..]);
    }
}
