use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::BillingPeriod;
use crate::modules::sms::models::SmsRecord;
use crate::modules::transactions::models::{Transaction, TransactionStatus, TransactionType};

/// One client's billing figures for one calendar month.
///
/// `billed` is the authoritative figure: the summed per-record cost of
/// SENT and DELIVERED SMS in the period. `billed_from_transactions` sums
/// DEBIT rows and exists only as a cross-check against the ledger; it is
/// never used for the outstanding balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub total_sms: u64,
    /// SENT + DELIVERED
    pub total_sent: u64,
    pub total_failed: u64,
    /// Sum of cost over every record regardless of status
    pub total_cost: Decimal,
    pub billed: Decimal,
    pub billed_from_transactions: Decimal,
    /// COMPLETED PAYMENT amounts inside the period
    pub paid_in_period: Decimal,
    /// max(billed − paid_in_period, 0)
    pub outstanding: Decimal,
}

impl MonthlySummary {
    /// Pure fold over the period's rows.
    ///
    /// Calling this twice over the same rows yields identical output; all
    /// I/O lives in the aggregator service.
    pub fn from_rows(
        period: BillingPeriod,
        sms_records: &[SmsRecord],
        transactions: &[Transaction],
    ) -> Self {
        let total_sms = sms_records.len() as u64;
        let total_sent = sms_records
            .iter()
            .filter(|r| r.status.is_billable())
            .count() as u64;
        let total_failed = sms_records
            .iter()
            .filter(|r| r.status == crate::modules::sms::models::SmsStatus::Failed)
            .count() as u64;

        let total_cost: Decimal = sms_records.iter().map(|r| r.cost).sum();
        let billed: Decimal = sms_records
            .iter()
            .filter(|r| r.status.is_billable())
            .map(|r| r.cost)
            .sum();

        let billed_from_transactions: Decimal = transactions
            .iter()
            .filter(|t| t.tx_type == TransactionType::Debit)
            .map(|t| t.amount.abs())
            .sum();

        let paid_in_period: Decimal = transactions
            .iter()
            .filter(|t| {
                t.tx_type == TransactionType::Payment
                    && t.status == TransactionStatus::Completed
            })
            .map(|t| t.amount)
            .sum();

        let outstanding = (billed - paid_in_period).max(Decimal::ZERO);

        Self {
            month: period.month,
            year: period.year,
            total_sms,
            total_sent,
            total_failed,
            total_cost,
            billed,
            billed_from_transactions,
            paid_in_period,
            outstanding,
        }
    }
}
