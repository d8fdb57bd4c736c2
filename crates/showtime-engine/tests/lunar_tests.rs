//! Tests for Gregorian → lunar conversion.

use chrono::NaiveDate;
use showtime_engine::error::ScheduleError;
use showtime_engine::lunar::{to_lunar, LunarDate, LunarTable};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lunar(year: i32, month: u32, day: u32, is_leap_month: bool) -> LunarDate {
    LunarDate {
        year,
        month,
        day,
        is_leap_month,
    }
}

// ── Tết seed dates ──────────────────────────────────────────────────────────

#[test]
fn tet_2025_first_day() {
    assert_eq!(to_lunar(date(2025, 1, 28)).unwrap(), lunar(2025, 1, 1, false));
}

#[test]
fn tet_2025_second_day() {
    assert_eq!(to_lunar(date(2025, 1, 29)).unwrap(), lunar(2025, 1, 2, false));
}

// These follow the seed data: the table is anchored at 1900-01-30 so that
// 2025-01-28 is lunar 1/1. The published calendar has Tết one day later
// (2024-02-10 and 2026-02-17).
#[test]
fn tet_2024_and_2026_follow_the_year_table() {
    assert_eq!(to_lunar(date(2024, 2, 9)).unwrap(), lunar(2024, 1, 1, false));
    assert_eq!(to_lunar(date(2026, 2, 16)).unwrap(), lunar(2026, 1, 1, false));
    assert_eq!(to_lunar(date(2026, 2, 17)).unwrap(), lunar(2026, 1, 2, false));
}

#[test]
fn last_day_before_tet_belongs_to_previous_lunar_year() {
    let l = to_lunar(date(2025, 1, 27)).unwrap();
    assert_eq!(l.year, 2024);
    assert_eq!(l.month, 12);
    assert!(!l.is_lunar_new_year());
}

// ── Leap months ─────────────────────────────────────────────────────────────

#[test]
fn leap_sixth_month_2025() {
    assert_eq!(to_lunar(date(2025, 7, 23)).unwrap(), lunar(2025, 6, 30, false));
    assert_eq!(to_lunar(date(2025, 7, 24)).unwrap(), lunar(2025, 6, 1, true));
    // The leap month has 29 days; the seventh month follows it.
    assert_eq!(to_lunar(date(2025, 8, 21)).unwrap(), lunar(2025, 6, 29, true));
    assert_eq!(to_lunar(date(2025, 8, 22)).unwrap(), lunar(2025, 7, 1, false));
}

#[test]
fn leap_second_month_2023() {
    assert_eq!(to_lunar(date(2023, 3, 21)).unwrap(), lunar(2023, 2, 1, true));
    assert_eq!(to_lunar(date(2023, 3, 22)).unwrap(), lunar(2023, 2, 2, true));
}

// ── Range boundaries ────────────────────────────────────────────────────────

#[test]
fn first_supported_day() {
    assert_eq!(to_lunar(date(1900, 1, 1)).unwrap(), lunar(1899, 12, 2, false));
}

#[test]
fn table_epoch_is_first_day_of_1900() {
    assert_eq!(to_lunar(date(1900, 1, 29)).unwrap(), lunar(1899, 12, 30, false));
    assert_eq!(to_lunar(LunarTable::epoch()).unwrap(), lunar(1900, 1, 1, false));
}

#[test]
fn last_supported_day() {
    assert_eq!(to_lunar(date(2100, 12, 31)).unwrap(), lunar(2100, 12, 2, false));
}

#[test]
fn years_outside_range_are_rejected() {
    assert!(matches!(
        to_lunar(date(1899, 12, 31)),
        Err(ScheduleError::LunarOutOfRange(1899))
    ));
    assert!(matches!(
        to_lunar(date(2101, 1, 1)),
        Err(ScheduleError::LunarOutOfRange(2101))
    ));
}

#[test]
fn table_covers_every_supported_year() {
    let table = LunarTable::vietnamese();
    for year in 1900..=2100 {
        let y = table.year(year).unwrap();
        assert!((353..=385).contains(&y.total_days()), "year {year}: {}", y.total_days());
    }
    assert!(table.year(1899).is_none());
    assert!(table.year(2101).is_none());
}

// ── Display ─────────────────────────────────────────────────────────────────

#[test]
fn display_marks_leap_months() {
    assert_eq!(to_lunar(date(2025, 7, 24)).unwrap().to_string(), "2025-06-01 (leap)");
    assert_eq!(to_lunar(date(2025, 1, 29)).unwrap().to_string(), "2025-01-02");
}
