use chrono::{Duration, TimeZone, Utc};

use smsbilling::core::BillingPeriod;

/// Billing windows follow Jakarta wall clock (UTC+7) and are half-open

#[test]
fn test_month_window_in_utc() {
    let period = BillingPeriod::new(8, 2026).unwrap();
    let (start, end) = period.utc_range();

    // Aug 1 00:00 WIB == Jul 31 17:00 UTC
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 7, 31, 17, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 8, 31, 17, 0, 0).unwrap());
}

#[test]
fn test_window_is_half_open() {
    let period = BillingPeriod::new(2, 2026).unwrap();
    let (start, end) = period.utc_range();

    assert!(period.contains(start));
    assert!(period.contains(end - Duration::nanoseconds(1)));
    assert!(!period.contains(end));
    assert!(!period.contains(start - Duration::nanoseconds(1)));
}

#[test]
fn test_adjacent_months_share_a_boundary() {
    let january = BillingPeriod::new(1, 2026).unwrap();
    let february = BillingPeriod::new(2, 2026).unwrap();

    let (_, january_end) = january.utc_range();
    let (february_start, _) = february.utc_range();

    // No instant falls in two periods and none falls in neither
    assert_eq!(january_end, february_start);
}

#[test]
fn test_year_rollover() {
    let december = BillingPeriod::new(12, 2026).unwrap();
    let (_, end) = december.utc_range();
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 12, 31, 17, 0, 0).unwrap());
}

#[test]
fn test_leap_february() {
    let period = BillingPeriod::new(2, 2028).unwrap();
    let (start, end) = period.utc_range();
    // 29 days in February 2028
    assert_eq!(end - start, Duration::days(29));
}

#[test]
fn test_validation() {
    assert!(BillingPeriod::new(0, 2026).is_err());
    assert!(BillingPeriod::new(13, 2026).is_err());
    assert!(BillingPeriod::new(6, 1999).is_err());
    assert!(BillingPeriod::new(6, 2026).is_ok());
}

#[test]
fn test_late_night_utc_lands_in_next_jakarta_month() {
    // 18:30 UTC on the last day of July is already August in Jakarta
    let instant = Utc.with_ymd_and_hms(2026, 7, 31, 18, 30, 0).unwrap();
    assert_eq!(
        BillingPeriod::containing(instant),
        BillingPeriod::new(8, 2026).unwrap()
    );

    // While mid-day UTC is still July
    let instant = Utc.with_ymd_and_hms(2026, 7, 31, 12, 0, 0).unwrap();
    assert_eq!(
        BillingPeriod::containing(instant),
        BillingPeriod::new(7, 2026).unwrap()
    );
}
