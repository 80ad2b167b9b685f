use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use smsbilling::billing::MonthlySummary;
use smsbilling::core::BillingPeriod;
use smsbilling::sms::{SmsRecord, SmsStatus};
use smsbilling::transactions::{PaymentPurpose, Transaction, TransactionStatus};

/// Property-based tests for the monthly billing fold
///
/// Validates:
/// - outstanding = max(billed − paid, 0) and never goes negative
/// - More completed payments never increase outstanding
/// - The fold is a pure function of its inputs

fn sms(status: SmsStatus, cost: i64) -> SmsRecord {
    SmsRecord::new(
        "client-1".to_string(),
        "+628123456789".to_string(),
        "Update status pengiriman".to_string(),
        status,
        Decimal::new(cost, 0),
        Some(Utc::now()),
        Utc::now(),
    )
}

fn completed_payment(amount: i64) -> Transaction {
    let mut tx = Transaction::new_payment(
        "client-1".to_string(),
        Decimal::new(amount, 0),
        PaymentPurpose::Billing,
        "Pembayaran tagihan".to_string(),
        uuid::Uuid::new_v4().to_string(),
    )
    .unwrap();
    tx.status = TransactionStatus::Completed;
    tx
}

fn period() -> BillingPeriod {
    BillingPeriod::new(8, 2026).unwrap()
}

proptest! {
    #[test]
    fn test_outstanding_never_negative(
        sent_costs in proptest::collection::vec(1i64..10_000, 0..40),
        payments in proptest::collection::vec(1i64..1_000_000, 0..10)
    ) {
        let records: Vec<SmsRecord> =
            sent_costs.iter().map(|c| sms(SmsStatus::Sent, *c)).collect();
        let transactions: Vec<Transaction> =
            payments.iter().map(|a| completed_payment(*a)).collect();

        let summary = MonthlySummary::from_rows(period(), &records, &transactions);

        prop_assert!(summary.outstanding >= Decimal::ZERO);
        prop_assert_eq!(
            summary.outstanding,
            (summary.billed - summary.paid_in_period).max(Decimal::ZERO)
        );
    }

    #[test]
    fn test_more_payments_never_increase_outstanding(
        sent_costs in proptest::collection::vec(1i64..10_000, 1..40),
        payments in proptest::collection::vec(1i64..100_000, 1..10)
    ) {
        let records: Vec<SmsRecord> =
            sent_costs.iter().map(|c| sms(SmsStatus::Sent, *c)).collect();

        let mut transactions: Vec<Transaction> = Vec::new();
        let mut previous_outstanding =
            MonthlySummary::from_rows(period(), &records, &transactions).outstanding;

        for amount in payments {
            transactions.push(completed_payment(amount));
            let outstanding =
                MonthlySummary::from_rows(period(), &records, &transactions).outstanding;
            prop_assert!(outstanding <= previous_outstanding);
            previous_outstanding = outstanding;
        }
    }

    #[test]
    fn test_failed_records_never_bill(
        failed_count in 0usize..30,
        sent_count in 0usize..30,
        unit_price in 1i64..5_000
    ) {
        let mut records = Vec::new();
        for _ in 0..failed_count {
            records.push(sms(SmsStatus::Failed, 0));
        }
        for _ in 0..sent_count {
            records.push(sms(SmsStatus::Sent, unit_price));
        }

        let summary = MonthlySummary::from_rows(period(), &records, &[]);

        prop_assert_eq!(summary.total_failed, failed_count as u64);
        prop_assert_eq!(
            summary.billed,
            Decimal::new(unit_price, 0) * Decimal::from(sent_count as u64)
        );
        prop_assert_eq!(summary.billed, summary.total_cost);
    }
}

#[test]
fn test_pending_payments_do_not_reduce_outstanding() {
    let records = vec![sms(SmsStatus::Sent, 500)];

    let mut pending = completed_payment(500);
    pending.status = TransactionStatus::Pending;

    let summary = MonthlySummary::from_rows(period(), &records, &[pending]);
    assert_eq!(summary.paid_in_period, Decimal::ZERO);
    assert_eq!(summary.outstanding, Decimal::new(500, 0));
}

#[test]
fn test_aggregation_is_idempotent() {
    let records = vec![
        sms(SmsStatus::Sent, 500),
        sms(SmsStatus::Delivered, 500),
        sms(SmsStatus::Failed, 0),
    ];
    let transactions = vec![completed_payment(600)];

    let first = MonthlySummary::from_rows(period(), &records, &transactions);
    let second = MonthlySummary::from_rows(period(), &records, &transactions);

    assert_eq!(first, second);
    assert_eq!(first.billed, Decimal::new(1000, 0));
    assert_eq!(first.outstanding, Decimal::new(400, 0));
}
