use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;

/// Derived invoice document for one client and one billing month.
///
/// All figures are in the client's display currency. `ppn` and `dpp_lain`
/// appear only on rupiah invoices; `dpp_lain` is a statutory reference line
/// and never contributes to `grand_total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub client_id: String,
    pub company_name: String,
    pub contact_email: String,
    pub month: u32,
    pub year: i32,
    pub currency: Currency,
    pub total_sms: u64,
    pub total_sent: u64,
    pub total_failed: u64,
    /// Billed amount before tax, in display currency
    pub base_total: Decimal,
    /// 11% VAT, rupiah invoices only
    pub ppn: Option<Decimal>,
    /// "DPP nilai lain" reference base (11/12 of the billed amount)
    pub dpp_lain: Option<Decimal>,
    pub grand_total: Decimal,
    pub amount_in_words_en: String,
    pub amount_in_words_id: String,
}
