use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::amount_words::{amount_to_words, Language};
use super::super::models::InvoiceDocument;
use crate::core::{Currency, Result};
use crate::modules::billing::MonthlySummary;
use crate::modules::clients::ClientProfile;

/// Indonesian VAT rate applied to rupiah invoices
const PPN_RATE: Decimal = Decimal::from_parts(11, 0, 0, false, 2);

/// "DPP nilai lain" factor: 11/12 of the billed amount, shown for reference
const DPP_LAIN_NUMERATOR: Decimal = Decimal::from_parts(11, 0, 0, false, 0);
const DPP_LAIN_DENOMINATOR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Turns a monthly summary into an invoice document.
///
/// VAT is computed on the rupiah figure before any currency conversion.
/// USD invoices carry no VAT line under current policy, so their grand
/// total equals the converted base.
pub struct InvoiceRenderer;

impl InvoiceRenderer {
    pub fn derive(summary: &MonthlySummary, profile: &ClientProfile) -> Result<InvoiceDocument> {
        let currency = profile.get_currency()?;
        let billed_idr = summary.billed;

        let base_total = currency.from_idr(billed_idr);

        let (ppn, dpp_lain, grand_total) = match currency {
            Currency::IDR => {
                let ppn = (billed_idr * PPN_RATE)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                let dpp_lain = (billed_idr * DPP_LAIN_NUMERATOR / DPP_LAIN_DENOMINATOR)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                (Some(ppn), Some(dpp_lain), base_total + ppn)
            }
            Currency::USD => (None, None, base_total),
        };

        Ok(InvoiceDocument {
            client_id: profile.client_id.clone(),
            company_name: profile.company_name.clone(),
            contact_email: profile.contact_email.clone(),
            month: summary.month,
            year: summary.year,
            currency,
            total_sms: summary.total_sms,
            total_sent: summary.total_sent,
            total_failed: summary.total_failed,
            base_total,
            ppn,
            dpp_lain,
            grand_total,
            amount_in_words_en: amount_to_words(grand_total, currency, Language::English),
            amount_in_words_id: amount_to_words(grand_total, currency, Language::Indonesian),
        })
    }

    /// Plain-text rendering used by the invoice download endpoint
    pub fn render_text(document: &InvoiceDocument) -> String {
        let mut out = String::new();

        out.push_str("INVOICE TAGIHAN SMS\n");
        out.push_str(&format!(
            "Periode: {:02}/{}\n\n",
            document.month, document.year
        ));
        out.push_str(&format!("Klien : {}\n", document.company_name));
        out.push_str(&format!("Email : {}\n\n", document.contact_email));

        out.push_str(&format!("Total SMS      : {}\n", document.total_sms));
        out.push_str(&format!("Terkirim       : {}\n", document.total_sent));
        out.push_str(&format!("Gagal          : {}\n\n", document.total_failed));

        out.push_str(&format!(
            "Tagihan        : {}\n",
            document.currency.format_amount(document.base_total)
        ));
        if let Some(ppn) = document.ppn {
            out.push_str(&format!(
                "PPN 11%        : {}\n",
                document.currency.format_amount(ppn)
            ));
        }
        if let Some(dpp_lain) = document.dpp_lain {
            out.push_str(&format!(
                "DPP Nilai Lain : {} (referensi)\n",
                document.currency.format_amount(dpp_lain)
            ));
        }
        out.push_str(&format!(
            "TOTAL          : {}\n\n",
            document.currency.format_amount(document.grand_total)
        ));

        out.push_str(&format!("Terbilang : {}\n", document.amount_in_words_id));
        out.push_str(&format!("In words  : {}\n", document.amount_in_words_en));

        out
    }
}
