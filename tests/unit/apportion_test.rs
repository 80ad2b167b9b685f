use proptest::prelude::*;

use smsbilling::sms::apportion;

// Property-based tests for largest-remainder apportionment
//
// Validates:
// - Output counts are nonnegative integers summing exactly to the total
// - Ties and all-zero share sets still preserve the sum invariant
// - Entry order is stable between input and output

proptest! {
    #[test]
    fn test_counts_always_sum_to_total(
        total in 0u64..100_000u64,
        shares in proptest::collection::vec(0.0f64..1000.0, 1..10)
    ) {
        let labeled: Vec<(usize, f64)> =
            shares.into_iter().enumerate().collect();

        let counts = apportion(total, &labeled).unwrap();

        let sum: u64 = counts.iter().map(|(_, c)| c).sum();
        prop_assert_eq!(sum, total, "counts must sum to the requested total");
        prop_assert_eq!(counts.len(), labeled.len());
    }

    #[test]
    fn test_labels_keep_input_order(
        total in 1u64..10_000u64,
        shares in proptest::collection::vec(0.0f64..100.0, 1..8)
    ) {
        let labeled: Vec<(usize, f64)> =
            shares.into_iter().enumerate().collect();

        let counts = apportion(total, &labeled).unwrap();

        for (position, (label, _)) in counts.iter().enumerate() {
            prop_assert_eq!(*label, position);
        }
    }

    #[test]
    fn test_proportional_shares_get_exact_counts(
        per_label in 1u64..1000u64,
        labels in 1usize..8
    ) {
        // Equal shares over a total divisible by the label count split evenly
        let total = per_label * labels as u64;
        let shares: Vec<(usize, f64)> = (0..labels).map(|i| (i, 25.0)).collect();

        let counts = apportion(total, &shares).unwrap();
        for (_, count) in counts {
            prop_assert_eq!(count, per_label);
        }
    }

    #[test]
    fn test_zero_shares_never_dominate(
        total in 1u64..10_000u64,
        nonzero in 1.0f64..100.0
    ) {
        // A zero-share label next to a nonzero one receives nothing
        let counts = apportion(total, &[("zero", 0.0), ("rest", nonzero)]).unwrap();
        assert_eq!(counts[0].1, 0);
        assert_eq!(counts[1].1, total);
    }
}

#[test]
fn test_delivery_mix_split() {
    let counts = apportion(
        100,
        &[("delivered", 80.0), ("undelivered", 15.0), ("failed", 5.0)],
    )
    .unwrap();

    assert_eq!(counts[0].1, 80);
    assert_eq!(counts[1].1, 15);
    assert_eq!(counts[2].1, 5);
}

#[test]
fn test_ties_break_in_input_order() {
    // Three equal remainders, one leftover unit: first label wins
    let counts = apportion(10, &[("a", 1.0), ("b", 1.0), ("c", 1.0)]).unwrap();
    assert_eq!(
        counts.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
        vec![4, 3, 3]
    );
}

#[test]
fn test_invalid_shares_rejected() {
    assert!(apportion(10, &[("a", -0.1)]).is_err());
    assert!(apportion(10, &[("a", f64::NAN)]).is_err());
}
