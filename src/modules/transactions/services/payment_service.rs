use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::super::models::{PaymentPurpose, Transaction, TransactionStatus};
use super::super::repositories::TransactionRepository;
use crate::core::{AppError, BillingPeriod, Result};
use crate::modules::clients::ClientRepository;
use crate::modules::gateways::{PaymentGateway, PaymentRequest};

/// Result of a successful payment initiation
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInitiation {
    pub transaction: Transaction,
    pub payment_url: Option<String>,
}

/// Creates PENDING payment transactions and registers them with the gateway.
pub struct PaymentService {
    transaction_repo: Arc<TransactionRepository>,
    client_repo: Arc<ClientRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(
        transaction_repo: Arc<TransactionRepository>,
        client_repo: Arc<ClientRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            transaction_repo,
            client_repo,
            gateway,
        }
    }

    /// Initiate a payment for a monthly bill or a balance top-up.
    ///
    /// The local transaction is created PENDING before the gateway call. An
    /// explicit gateway rejection marks it FAILED; a transport failure leaves
    /// it PENDING for a later poll to settle.
    pub async fn initiate(
        &self,
        client_id: &str,
        amount: Decimal,
        purpose: PaymentPurpose,
        period: Option<BillingPeriod>,
    ) -> Result<PaymentInitiation> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Amount must be greater than 0"));
        }

        let profile = self.client_repo.require_active(client_id).await?;

        let (reference_id, description) = match (purpose, period) {
            (PaymentPurpose::Billing, Some(period)) => (
                format!(
                    "PAY_{}{:02}_{}",
                    period.year,
                    period.month,
                    short_uuid()
                ),
                format!("Pembayaran tagihan bulan {}", period),
            ),
            (PaymentPurpose::Billing, None) => {
                return Err(AppError::validation(
                    "Billing payments require a month and year",
                ));
            }
            (PaymentPurpose::TopUp, _) => {
                (format!("TXN_{}", short_uuid()), "Top up saldo".to_string())
            }
        };

        let transaction = Transaction::new_payment(
            client_id.to_string(),
            amount,
            purpose,
            description.clone(),
            reference_id.clone(),
        )?;
        let transaction = self.transaction_repo.create(&transaction).await?;

        let request = PaymentRequest {
            reference_id,
            amount,
            currency: profile.get_currency()?,
            description,
            customer_name: profile.company_name.clone(),
            email: Some(profile.contact_email.clone()),
            phone_number: profile.phone_number.clone(),
        };

        match self.gateway.create_payment(&request).await {
            Ok(response) => {
                if let Some(channel_trx_id) = &response.channel_trx_id {
                    self.transaction_repo
                        .set_channel_trx_id(&transaction.id, channel_trx_id)
                        .await?;
                }

                info!(
                    transaction_id = %transaction.id,
                    client_id = %client_id,
                    amount = %amount,
                    purpose = ?purpose,
                    gateway = self.gateway.name(),
                    "Payment initiated"
                );

                let transaction = self
                    .transaction_repo
                    .find_by_id(&transaction.id)
                    .await?
                    .ok_or_else(|| AppError::internal("Transaction vanished after creation"))?;

                Ok(PaymentInitiation {
                    transaction,
                    payment_url: response.payment_url,
                })
            }
            Err(AppError::Gateway(message)) => {
                // The gateway explicitly rejected the charge
                warn!(
                    transaction_id = %transaction.id,
                    gateway = self.gateway.name(),
                    %message,
                    "Payment creation rejected, marking transaction failed"
                );
                self.transaction_repo
                    .update_status(
                        &transaction.id,
                        TransactionStatus::Failed,
                        None,
                        Some(&message),
                    )
                    .await?;
                Err(AppError::Gateway(message))
            }
            // Transport errors keep the transaction PENDING; the charge may
            // still exist on the gateway side
            Err(other) => Err(other),
        }
    }

    /// Fetch one transaction, enforcing owner/admin visibility
    pub async fn get_transaction(
        &self,
        id: &str,
        caller_client_id: &str,
        is_admin: bool,
    ) -> Result<Transaction> {
        let transaction = self
            .transaction_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Transaction '{}' not found", id)))?;

        if !is_admin && transaction.client_id != caller_client_id {
            return Err(AppError::unauthorized(
                "Transaction belongs to another client",
            ));
        }

        Ok(transaction)
    }
}

fn short_uuid() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}
