use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use smsbilling::sms::{build_records, SmsStatus, StatusMix};

fn window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start = Utc.with_ymd_and_hms(2026, 8, 10, 9, 0, 0).unwrap();
    (start, start + Duration::minutes(20))
}

#[test]
fn test_legacy_failure_target_is_exact() {
    let (start, end) = window();
    let mut rng = StdRng::seed_from_u64(1);

    let (records, summary) = build_records(
        "client-1",
        100,
        dec!(500),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 5.0,
        },
        &mut rng,
    )
    .unwrap();

    assert_eq!(records.len(), 100);
    assert_eq!(summary.requested, 100);
    assert_eq!(summary.failed, 5);
    assert_eq!(summary.sent, 95);
    assert_eq!(summary.total_cost, dec!(47_500));

    let failed = records
        .iter()
        .filter(|r| r.status == SmsStatus::Failed)
        .count();
    assert_eq!(failed, 5);
}

#[test]
fn test_failed_records_cost_zero_and_sent_cost_unit_price() {
    let (start, end) = window();
    let mut rng = StdRng::seed_from_u64(2);

    let (records, _) = build_records(
        "client-1",
        50,
        dec!(750),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 40.0,
        },
        &mut rng,
    )
    .unwrap();

    for record in &records {
        if record.status == SmsStatus::Failed {
            assert_eq!(record.cost, Decimal::ZERO);
        } else {
            assert_eq!(record.cost, dec!(750));
        }
    }
}

#[test]
fn test_three_way_mix_statuses() {
    let (start, end) = window();
    let mut rng = StdRng::seed_from_u64(3);

    let (records, summary) = build_records(
        "client-1",
        100,
        dec!(500),
        start,
        end,
        StatusMix::ThreeWay {
            delivered: 80.0,
            undelivered: 15.0,
            failed: 5.0,
        },
        &mut rng,
    )
    .unwrap();

    let delivered = records
        .iter()
        .filter(|r| r.status == SmsStatus::Delivered)
        .count();
    let sent = records.iter().filter(|r| r.status == SmsStatus::Sent).count();
    let failed = records
        .iter()
        .filter(|r| r.status == SmsStatus::Failed)
        .count();

    assert_eq!((delivered, sent, failed), (80, 15, 5));
    // "sent" in the summary means non-failed
    assert_eq!(summary.sent, 95);
    assert_eq!(summary.total_cost, dec!(47_500));
}

#[test]
fn test_timestamps_stay_inside_window() {
    let (start, end) = window();
    let mut rng = StdRng::seed_from_u64(4);

    let (records, _) = build_records(
        "client-1",
        200,
        dec!(500),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 0.0,
        },
        &mut rng,
    )
    .unwrap();

    for record in &records {
        assert!(record.created_at >= start);
        assert!(record.created_at < end);
        assert_eq!(record.sent_at, Some(record.created_at));
    }
}

#[test]
fn test_synthetic_phone_numbers_are_local() {
    let (start, end) = window();
    let mut rng = StdRng::seed_from_u64(5);

    let (records, _) = build_records(
        "client-1",
        30,
        dec!(500),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 10.0,
        },
        &mut rng,
    )
    .unwrap();

    for record in &records {
        assert!(record.phone_number.starts_with("+628"));
        // +628 plus nine digits
        assert_eq!(record.phone_number.len(), 13);
        assert!(!record.message.is_empty());
    }
}

#[test]
fn test_same_seed_reproduces_the_batch() {
    let (start, end) = window();
    let mix = StatusMix::ThreeWay {
        delivered: 70.0,
        undelivered: 20.0,
        failed: 10.0,
    };

    let mut rng_a = StdRng::seed_from_u64(42);
    let (records_a, summary_a) =
        build_records("client-1", 60, dec!(500), start, end, mix, &mut rng_a).unwrap();

    let mut rng_b = StdRng::seed_from_u64(42);
    let (records_b, summary_b) =
        build_records("client-1", 60, dec!(500), start, end, mix, &mut rng_b).unwrap();

    assert_eq!(summary_a.failed, summary_b.failed);
    assert_eq!(summary_a.total_cost, summary_b.total_cost);

    for (a, b) in records_a.iter().zip(records_b.iter()) {
        assert_eq!(a.phone_number, b.phone_number);
        assert_eq!(a.status, b.status);
        assert_eq!(a.created_at, b.created_at);
        assert_eq!(a.message, b.message);
    }
}

#[test]
fn test_zero_percentage_rounding_boundaries() {
    let (start, end) = window();

    // 0% fails nothing, 100% fails everything
    let mut rng = StdRng::seed_from_u64(6);
    let (_, summary) = build_records(
        "client-1",
        7,
        dec!(500),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 0.0,
        },
        &mut rng,
    )
    .unwrap();
    assert_eq!(summary.failed, 0);

    let (_, summary) = build_records(
        "client-1",
        7,
        dec!(500),
        start,
        end,
        StatusMix::Legacy {
            failed_percentage: 100.0,
        },
        &mut rng,
    )
    .unwrap();
    assert_eq!(summary.failed, 7);
    assert_eq!(summary.total_cost, Decimal::ZERO);
}
