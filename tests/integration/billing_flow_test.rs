use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use smsbilling::billing::MonthlySummary;
use smsbilling::clients::ClientProfile;
use smsbilling::core::{BillingPeriod, Currency};
use smsbilling::invoices::InvoiceRenderer;
use smsbilling::sms::{build_records, StatusMix};
use smsbilling::transactions::services::{plan_transition, resolve_webhook_status};
use smsbilling::transactions::{PaymentPurpose, Transaction, TransactionStatus};

/// End-to-end billing month over in-process components:
/// generate traffic → aggregate → invoice → pay → reconcile → settle.

#[test]
fn test_full_billing_month_settles_to_zero() {
    let period = BillingPeriod::containing(Utc::now());
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(2026);

    // Admin generates 100 mock SMS at 500 IDR each: 80/15/5 split
    let (records, generation) = build_records(
        "client-1",
        100,
        dec!(500),
        now,
        now + Duration::minutes(20),
        StatusMix::ThreeWay {
            delivered: 80.0,
            undelivered: 15.0,
            failed: 5.0,
        },
        &mut rng,
    )
    .unwrap();

    assert_eq!(generation.requested, 100);
    assert_eq!(generation.failed, 5);
    assert_eq!(generation.sent, 95);
    assert_eq!(generation.total_cost, dec!(47_500));

    // The client's monthly summary shows the full amount outstanding
    let summary = MonthlySummary::from_rows(period, &records, &[]);
    assert_eq!(summary.total_sms, 100);
    assert_eq!(summary.billed, dec!(47_500));
    assert_eq!(summary.paid_in_period, Decimal::ZERO);
    assert_eq!(summary.outstanding, dec!(47_500));

    // The invoice for the same month carries VAT on top
    let profile = ClientProfile::new(
        "client-1".to_string(),
        "PT Maju Jaya".to_string(),
        "billing@majujaya.co.id".to_string(),
        None,
        Currency::IDR,
    )
    .unwrap();
    let invoice = InvoiceRenderer::derive(&summary, &profile).unwrap();
    assert_eq!(invoice.base_total, dec!(47_500));
    assert_eq!(invoice.ppn, Some(dec!(5_225)));
    assert_eq!(invoice.grand_total, dec!(52_725));

    // The client initiates a payment for the billed amount
    let mut payment = Transaction::new_payment(
        "client-1".to_string(),
        dec!(47_500),
        PaymentPurpose::Billing,
        format!("Pembayaran tagihan bulan {}", period),
        format!("PAY_{}{:02}_e2e", period.year, period.month),
    )
    .unwrap();
    assert_eq!(payment.status, TransactionStatus::Pending);

    // Gateway webhook arrives with the success code
    let resolved = resolve_webhook_status(Some(1000), None);
    let next = plan_transition(payment.status, resolved).expect("pending settles");
    payment.status = next;
    assert_eq!(payment.status, TransactionStatus::Completed);

    // Re-running the aggregation now shows a settled month
    let summary = MonthlySummary::from_rows(period, &records, &[payment.clone()]);
    assert_eq!(summary.billed, dec!(47_500));
    assert_eq!(summary.paid_in_period, dec!(47_500));
    assert_eq!(summary.outstanding, Decimal::ZERO);

    // A contradictory late webhook cannot unsettle the payment
    let late = resolve_webhook_status(None, Some("FAILED"));
    assert_eq!(plan_transition(payment.status, late), None);
}

#[test]
fn test_partial_payment_leaves_remainder_outstanding() {
    let period = BillingPeriod::containing(Utc::now());
    let now = Utc::now();
    let mut rng = StdRng::seed_from_u64(7);

    let (records, _) = build_records(
        "client-1",
        40,
        dec!(500),
        now,
        now + Duration::minutes(10),
        StatusMix::Legacy {
            failed_percentage: 0.0,
        },
        &mut rng,
    )
    .unwrap();

    let mut payment = Transaction::new_payment(
        "client-1".to_string(),
        dec!(12_000),
        PaymentPurpose::Billing,
        "Pembayaran sebagian".to_string(),
        "PAY_partial".to_string(),
    )
    .unwrap();
    payment.status = TransactionStatus::Completed;

    let summary = MonthlySummary::from_rows(period, &records, &[payment]);
    assert_eq!(summary.billed, dec!(20_000));
    assert_eq!(summary.outstanding, dec!(8_000));
}

#[test]
fn test_top_up_flow_is_separate_from_billing() {
    // A completed top-up is still a PAYMENT row in the period, so it
    // counts toward paid_in_period; its balance side effect lives in the
    // reconciler, not in the aggregation
    let period = BillingPeriod::containing(Utc::now());

    let mut top_up = Transaction::new_payment(
        "client-1".to_string(),
        dec!(100_000),
        PaymentPurpose::TopUp,
        "Top up saldo".to_string(),
        "TXN_topup".to_string(),
    )
    .unwrap();
    top_up.status = TransactionStatus::Completed;
    assert_eq!(top_up.purpose, PaymentPurpose::TopUp);

    let summary = MonthlySummary::from_rows(period, &[], &[top_up]);
    assert_eq!(summary.billed, Decimal::ZERO);
    assert_eq!(summary.paid_in_period, dec!(100_000));
    assert_eq!(summary.outstanding, Decimal::ZERO);
}
