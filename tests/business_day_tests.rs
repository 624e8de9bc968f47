mod common;
use common::{utc, ymd};
use qrattend::core::business_day::{BusinessClock, format_dmy, parse_dmy};
use qrattend::errors::AppError;

fn lima() -> BusinessClock {
    BusinessClock::new(-5).expect("valid offset")
}

#[test]
fn test_window_is_local_midnight_to_last_millisecond() {
    let w = lima().window(ymd(2026, 1, 10));

    assert_eq!(w.start, utc("2026-01-10T05:00:00Z"));
    assert_eq!(w.end, utc("2026-01-11T04:59:59.999Z"));
    assert_eq!(w.date, ymd(2026, 1, 10));
}

#[test]
fn test_day_boundary_splits_at_five_utc() {
    let clock = lima();

    let before = utc("2026-01-10T04:59:59.999Z");
    let after = utc("2026-01-10T05:00:00Z");

    assert_eq!(clock.local_date(before), ymd(2026, 1, 9));
    assert_eq!(clock.local_date(after), ymd(2026, 1, 10));
    assert_ne!(clock.window_containing(before), clock.window_containing(after));
}

#[test]
fn test_late_evening_scan_stays_on_its_local_day() {
    let clock = lima();

    // 22:30 local on the 10th is already the 11th in UTC
    let late = utc("2026-01-11T03:30:00Z");
    let w = clock.window_containing(late);

    assert_eq!(w.date, ymd(2026, 1, 10));
    assert!(w.contains(late));
    assert!(!clock.window(ymd(2026, 1, 11)).contains(late));
}

#[test]
fn test_exactly_one_window_contains_an_instant() {
    let clock = lima();
    let instant = utc("2026-03-01T05:00:00Z");

    let containing: Vec<_> = (27..=28)
        .map(|d| clock.window(ymd(2026, 2, d)))
        .chain((1..=2).map(|d| clock.window(ymd(2026, 3, d))))
        .filter(|w| w.contains(instant))
        .collect();

    assert_eq!(containing.len(), 1);
    assert_eq!(containing[0].date, ymd(2026, 3, 1));
}

#[test]
fn test_local_noon_is_seventeen_utc() {
    assert_eq!(lima().local_noon(ymd(2026, 1, 6)), utc("2026-01-06T17:00:00Z"));
}

#[test]
fn test_window_for_invalid_triple_is_rejected() {
    let clock = lima();

    assert!(matches!(
        clock.window_for_dmy(31, 4, 2026),
        Err(AppError::InvalidDate(_))
    ));
    assert!(matches!(
        clock.window_for_dmy(29, 2, 2026),
        Err(AppError::InvalidDate(_))
    ));
    assert!(clock.window_for_dmy(29, 2, 2028).is_ok());
}

#[test]
fn test_parse_and_format_dmy() {
    assert_eq!(parse_dmy("06/01/2026").unwrap(), ymd(2026, 1, 6));
    assert_eq!(parse_dmy(" 6/1/2026 ").unwrap(), ymd(2026, 1, 6));
    assert_eq!(format_dmy(ymd(2026, 1, 6)), "06/01/2026");

    assert!(matches!(parse_dmy("31/04/2026"), Err(AppError::InvalidDate(_))));
    assert!(matches!(parse_dmy("2026-01-06"), Err(AppError::InvalidDate(_))));
    assert!(matches!(parse_dmy("06/01/26"), Err(AppError::InvalidDate(_))));
}

#[test]
fn test_local_time_formatting() {
    let clock = lima();
    let instant = utc("2026-01-11T03:30:15Z");

    assert_eq!(clock.format_date(instant), "10/01/2026");
    assert_eq!(clock.format_time(instant), "22:30:15");
}

#[test]
fn test_offset_out_of_range_is_a_config_error() {
    assert!(matches!(BusinessClock::new(24), Err(AppError::Config(_))));
    assert!(matches!(BusinessClock::new(-24), Err(AppError::Config(_))));
    assert!(BusinessClock::new(0).is_ok());
}
