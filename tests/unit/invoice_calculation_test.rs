use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use smsbilling::billing::MonthlySummary;
use smsbilling::clients::ClientProfile;
use smsbilling::core::{BillingPeriod, Currency};
use smsbilling::invoices::InvoiceRenderer;

/// Tests for the invoice tax and currency derivation
///
/// Validates:
/// - PPN = round(billed × 0.11), shown for rupiah invoices only
/// - DPP "nilai lain" = round(billed × 11/12), display-only
/// - grand_total is monotone non-decreasing in billed and VAT never negative

fn profile(currency: Currency) -> ClientProfile {
    ClientProfile::new(
        "client-1".to_string(),
        "PT Maju Jaya".to_string(),
        "billing@majujaya.co.id".to_string(),
        None,
        currency,
    )
    .unwrap()
}

fn summary(billed: Decimal) -> MonthlySummary {
    let period = BillingPeriod::new(8, 2026).unwrap();
    MonthlySummary {
        month: period.month,
        year: period.year,
        total_sms: 0,
        total_sent: 0,
        total_failed: 0,
        total_cost: billed,
        billed,
        billed_from_transactions: Decimal::ZERO,
        paid_in_period: Decimal::ZERO,
        outstanding: billed,
    }
}

#[test]
fn test_one_million_rupiah_reference_case() {
    let document =
        InvoiceRenderer::derive(&summary(dec!(1_000_000)), &profile(Currency::IDR)).unwrap();

    assert_eq!(document.ppn, Some(dec!(110_000)));
    assert_eq!(document.dpp_lain, Some(dec!(916_667)));
    assert_eq!(document.grand_total, dec!(1_110_000));
}

#[test]
fn test_dpp_lain_is_display_only() {
    let document =
        InvoiceRenderer::derive(&summary(dec!(1_000_000)), &profile(Currency::IDR)).unwrap();

    assert_eq!(
        document.grand_total,
        document.base_total + document.ppn.unwrap()
    );
    // Explicitly not base + ppn + dpp_lain
    assert!(document.grand_total < document.base_total + document.dpp_lain.unwrap());
}

#[test]
fn test_usd_invoice_converts_at_fixed_rate() {
    let document =
        InvoiceRenderer::derive(&summary(dec!(775_000)), &profile(Currency::USD)).unwrap();

    // 775,000 / 16,000 = 48.4375 → 48.44 at two decimals
    assert_eq!(document.base_total, dec!(48.44));
    assert_eq!(document.grand_total, dec!(48.44));
    assert_eq!(document.ppn, None);
    assert_eq!(document.dpp_lain, None);
}

#[test]
fn test_words_in_both_languages() {
    let document =
        InvoiceRenderer::derive(&summary(dec!(47_500)), &profile(Currency::IDR)).unwrap();

    // 47,500 + 5,225 VAT = 52,725
    assert_eq!(document.grand_total, dec!(52_725));
    assert_eq!(
        document.amount_in_words_id,
        "lima puluh dua ribu tujuh ratus dua puluh lima rupiah"
    );
    assert_eq!(
        document.amount_in_words_en,
        "fifty-two thousand seven hundred twenty-five rupiah"
    );
}

proptest! {
    #[test]
    fn test_grand_total_monotone_in_billed(
        billed_a in 0i64..100_000_000,
        delta in 0i64..10_000_000
    ) {
        let low =
            InvoiceRenderer::derive(&summary(Decimal::new(billed_a, 0)), &profile(Currency::IDR))
                .unwrap();
        let high = InvoiceRenderer::derive(
            &summary(Decimal::new(billed_a + delta, 0)),
            &profile(Currency::IDR),
        )
        .unwrap();

        prop_assert!(high.grand_total >= low.grand_total);
    }

    #[test]
    fn test_vat_never_negative(billed in 0i64..100_000_000) {
        let document =
            InvoiceRenderer::derive(&summary(Decimal::new(billed, 0)), &profile(Currency::IDR))
                .unwrap();

        prop_assert!(document.ppn.unwrap() >= Decimal::ZERO);
        prop_assert!(document.grand_total >= document.base_total);
    }

    #[test]
    fn test_usd_monotone_too(
        billed_a in 0i64..100_000_000,
        delta in 0i64..10_000_000
    ) {
        let low =
            InvoiceRenderer::derive(&summary(Decimal::new(billed_a, 0)), &profile(Currency::USD))
                .unwrap();
        let high = InvoiceRenderer::derive(
            &summary(Decimal::new(billed_a + delta, 0)),
            &profile(Currency::USD),
        )
        .unwrap();

        prop_assert!(high.grand_total >= low.grand_total);
    }
}
