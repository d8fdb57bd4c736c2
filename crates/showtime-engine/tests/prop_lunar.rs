//! Property-based tests for the lunar converter using proptest.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use showtime_engine::lunar::to_lunar;

/// Any date in 1900-01-01..=2100-12-31.
fn arb_supported_date() -> impl Strategy<Value = NaiveDate> {
    let first = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(2100, 12, 31).unwrap();
    let span = (last - first).num_days();
    (0..=span).prop_map(move |offset| first + Duration::days(offset))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn lunar_fields_in_range(date in arb_supported_date()) {
        let l = to_lunar(date).unwrap();
        prop_assert!((1..=12).contains(&l.month), "month {} for {}", l.month, date);
        prop_assert!((1..=30).contains(&l.day), "day {} for {}", l.day, date);
    }

    #[test]
    fn lunar_year_trails_civil_year_by_at_most_one(date in arb_supported_date()) {
        let l = to_lunar(date).unwrap();
        prop_assert!(l.year == date.year() || l.year == date.year() - 1);
    }

    #[test]
    fn consecutive_days_advance_or_start_a_new_month(date in arb_supported_date()) {
        let next = date + Duration::days(1);
        prop_assume!(next.year() <= 2100);
        let a = to_lunar(date).unwrap();
        let b = to_lunar(next).unwrap();
        if b.day == 1 {
            prop_assert!((29..=30).contains(&a.day), "{} ended month on day {}", date, a.day);
        } else {
            prop_assert_eq!(b.day, a.day + 1);
            prop_assert_eq!((b.year, b.month, b.is_leap_month), (a.year, a.month, a.is_leap_month));
        }
    }

    #[test]
    fn conversion_is_deterministic(date in arb_supported_date()) {
        prop_assert_eq!(to_lunar(date).unwrap(), to_lunar(date).unwrap());
    }
}
