use futures_util::try_join;
use std::sync::Arc;
use tracing::debug;

use super::super::models::MonthlySummary;
use crate::core::{BillingPeriod, Result};
use crate::modules::clients::{ClientProfile, ClientRepository};
use crate::modules::sms::SmsRepository;
use crate::modules::transactions::TransactionRepository;

/// Computes a client's monthly billing summary.
///
/// Strictly read-only: both fetches and the fold have no side effects, so
/// repeated calls over unchanged data return identical results.
pub struct BillingAggregator {
    client_repo: Arc<ClientRepository>,
    sms_repo: Arc<SmsRepository>,
    transaction_repo: Arc<TransactionRepository>,
}

impl BillingAggregator {
    pub fn new(
        client_repo: Arc<ClientRepository>,
        sms_repo: Arc<SmsRepository>,
        transaction_repo: Arc<TransactionRepository>,
    ) -> Self {
        Self {
            client_repo,
            sms_repo,
            transaction_repo,
        }
    }

    /// Summarize one client's calendar month.
    ///
    /// Returns the summary together with the profile so callers rendering
    /// invoices do not re-fetch it.
    pub async fn summarize(
        &self,
        client_id: &str,
        period: BillingPeriod,
    ) -> Result<(MonthlySummary, ClientProfile)> {
        let profile = self.client_repo.require_active(client_id).await?;

        let (start, end) = period.utc_range();
        debug!(client_id, %period, %start, %end, "Aggregating billing window");

        let (sms_records, transactions) = try_join!(
            self.sms_repo.find_in_window(client_id, start, end),
            self.transaction_repo
                .find_billing_rows_in_window(client_id, start, end),
        )?;

        let summary = MonthlySummary::from_rows(period, &sms_records, &transactions);
        Ok((summary, profile))
    }
}
