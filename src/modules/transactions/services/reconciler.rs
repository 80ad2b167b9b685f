use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::super::models::{PaymentPurpose, Transaction, TransactionStatus};
use super::super::repositories::TransactionRepository;
use crate::core::{AppError, Result};
use crate::modules::clients::ClientRepository;
use crate::modules::gateways::PaymentGateway;

/// Provider numeric status codes carried by webhook payloads
const CODE_COMPLETED: i64 = 1000;
const CODE_PENDING: i64 = 1001;
const CODE_FAILED: i64 = 1005;

/// Inbound webhook payload.
///
/// Trust is established upstream (network or shared secret); this layer only
/// interprets the content. Field aliases cover the payload variants the
/// provider has shipped over time.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookNotification {
    #[serde(alias = "reference_id", alias = "referenceId")]
    pub merchant_transaction_id: Option<String>,
    pub status_code: Option<i64>,
    #[serde(alias = "payment_status")]
    pub status: Option<String>,
    #[serde(alias = "chanel_trx_id")]
    pub channel_trx_id: Option<String>,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
}

/// Which transaction a status poll targets
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionLookup {
    pub transaction_id: Option<String>,
    pub channel_trx_id: Option<String>,
}

/// Caller identity for authorization of status polls
#[derive(Debug, Clone)]
pub struct Caller {
    pub client_id: String,
    pub is_admin: bool,
}

/// Outcome reported back to webhook and poll callers
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub transaction_id: String,
    pub status: TransactionStatus,
    /// False when the event was a replay or carried no new information
    pub changed: bool,
}

/// Map a webhook payload to a domain status.
///
/// A numeric `status_code` wins over the string form; unknown codes mean
/// "no new information". The string form defaults to PENDING, matching the
/// provider's documented fallback.
pub fn resolve_webhook_status(
    status_code: Option<i64>,
    status: Option<&str>,
) -> Option<TransactionStatus> {
    if let Some(code) = status_code {
        return match code {
            CODE_COMPLETED => Some(TransactionStatus::Completed),
            CODE_FAILED => Some(TransactionStatus::Failed),
            CODE_PENDING => Some(TransactionStatus::Pending),
            _ => None,
        };
    }

    let status = status.unwrap_or("").to_uppercase();
    match status.as_str() {
        "SUCCESS" | "PAID" | "COMPLETED" => Some(TransactionStatus::Completed),
        "FAILED" => Some(TransactionStatus::Failed),
        _ => Some(TransactionStatus::Pending),
    }
}

/// Map a gateway status-poll string to a domain status.
/// Anything unrecognized means "leave the transaction as it is".
pub fn resolve_poll_status(status: &str) -> Option<TransactionStatus> {
    match status.to_uppercase().as_str() {
        "COMPLETED" | "SUCCESS" | "PAID" => Some(TransactionStatus::Completed),
        "FAILED" | "CANCELLED" | "EXPIRED" => Some(TransactionStatus::Failed),
        _ => None,
    }
}

/// Decide whether a resolved status may be applied.
///
/// Terminal statuses are immutable: a COMPLETED transaction fed a FAILED
/// webhook stays COMPLETED. Reversals are separate REFUND transactions.
pub fn plan_transition(
    current: TransactionStatus,
    resolved: Option<TransactionStatus>,
) -> Option<TransactionStatus> {
    if current.is_terminal() {
        return None;
    }

    match resolved {
        Some(next) if next != current && next != TransactionStatus::Pending => Some(next),
        _ => None,
    }
}

/// Reconciles local transactions against gateway callbacks and polls.
pub struct PaymentReconciler {
    transaction_repo: Arc<TransactionRepository>,
    client_repo: Arc<ClientRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentReconciler {
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

    /// Apply an inbound webhook to the referenced transaction.
    ///
    /// Replays of already-settled transactions return the current state
    /// without touching it.
    pub async fn apply_webhook(&self, notification: &WebhookNotification) -> Result<ReconcileOutcome> {
        let reference_id = notification
            .merchant_transaction_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Webhook is missing the merchant reference id"))?;

        let transaction = self
            .transaction_repo
            .find_by_reference_id(reference_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Transaction for reference '{}' not found", reference_id))
            })?;

        // Late channel id: webhooks may carry it before any poll happened
        if transaction.channel_trx_id.is_none() {
            if let Some(channel_trx_id) = &notification.channel_trx_id {
                self.transaction_repo
                    .set_channel_trx_id(&transaction.id, channel_trx_id)
                    .await?;
            }
        }

        let resolved =
            resolve_webhook_status(notification.status_code, notification.status.as_deref());

        self.apply(
            transaction,
            resolved,
            notification.failure_code.as_deref(),
            notification.failure_message.as_deref(),
        )
        .await
    }

    /// Poll the gateway for a transaction's current state and reconcile.
    ///
    /// Only the owning client or an admin may poll. A gateway failure leaves
    /// the transaction untouched and surfaces as a recoverable error.
    pub async fn check_status(
        &self,
        lookup: &TransactionLookup,
        caller: &Caller,
    ) -> Result<ReconcileOutcome> {
        let transaction = self.find_transaction(lookup).await?;

        if !caller.is_admin && caller.client_id != transaction.client_id {
            return Err(AppError::unauthorized(
                "Transaction belongs to another client",
            ));
        }

        // Settled transactions need no gateway round-trip
        if transaction.is_terminal() {
            return Ok(ReconcileOutcome {
                transaction_id: transaction.id,
                status: transaction.status,
                changed: false,
            });
        }

        let channel_trx_id = transaction.channel_trx_id.clone().ok_or_else(|| {
            AppError::inconsistent(format!(
                "Transaction '{}' has no channel transaction id yet",
                transaction.id
            ))
        })?;

        let gateway_status = self.gateway.fetch_status(&channel_trx_id).await?;

        info!(
            transaction_id = %transaction.id,
            gateway = self.gateway.name(),
            status = %gateway_status.status,
            "Gateway status poll"
        );

        let resolved = resolve_poll_status(&gateway_status.status);

        self.apply(
            transaction,
            resolved,
            gateway_status.failure_code.as_deref(),
            gateway_status.failure_message.as_deref(),
        )
        .await
    }

    async fn find_transaction(&self, lookup: &TransactionLookup) -> Result<Transaction> {
        if let Some(id) = &lookup.transaction_id {
            return self
                .transaction_repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Transaction '{}' not found", id)));
        }

        if let Some(channel_trx_id) = &lookup.channel_trx_id {
            return self
                .transaction_repo
                .find_by_channel_trx_id(channel_trx_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Transaction for channel '{}' not found",
                        channel_trx_id
                    ))
                });
        }

        Err(AppError::validation(
            "Either transaction_id or channel_trx_id is required",
        ))
    }

    /// Complete a top-up: status write plus balance credit in one database
    /// transaction. The PENDING guard inside the status write means a replay
    /// aborts before the balance is touched, so the credit applies once.
    async fn complete_top_up(
        &self,
        transaction: &Transaction,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<()> {
        let mut tx = self.transaction_repo.pool().begin().await?;
        self.transaction_repo
            .update_status_with_tx(
                &transaction.id,
                TransactionStatus::Completed,
                failure_code,
                failure_message,
                &mut *tx,
            )
            .await?;
        self.client_repo
            .increment_balance_with_tx(&transaction.client_id, transaction.amount, &mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Write the planned transition, with the purpose-specific side effect.
    ///
    /// Top-up completion increments the display balance in the same database
    /// transaction as the status write, so replays can never double-apply it.
    async fn apply(
        &self,
        transaction: Transaction,
        resolved: Option<TransactionStatus>,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<ReconcileOutcome> {
        let Some(next) = plan_transition(transaction.status, resolved) else {
            return Ok(ReconcileOutcome {
                transaction_id: transaction.id,
                status: transaction.status,
                changed: false,
            });
        };

        let result = if next == TransactionStatus::Completed
            && transaction.purpose == PaymentPurpose::TopUp
        {
            self.complete_top_up(&transaction, failure_code, failure_message)
                .await
        } else {
            self.transaction_repo
                .update_status(&transaction.id, next, failure_code, failure_message)
                .await
        };

        match result {
            Ok(()) => {
                info!(
                    transaction_id = %transaction.id,
                    from = %transaction.status,
                    to = %next,
                    purpose = ?transaction.purpose,
                    "Transaction reconciled"
                );
                Ok(ReconcileOutcome {
                    transaction_id: transaction.id,
                    status: next,
                    changed: true,
                })
            }
            // Lost a race against another reconciliation; the row is already
            // settled, so report its state instead of failing the webhook
            Err(AppError::InconsistentState(_)) => {
                warn!(
                    transaction_id = %transaction.id,
                    "Concurrent reconciliation already settled this transaction"
                );
                let current = self
                    .transaction_repo
                    .find_by_id(&transaction.id)
                    .await?
                    .ok_or_else(|| AppError::internal("Transaction vanished during reconcile"))?;
                Ok(ReconcileOutcome {
                    transaction_id: current.id,
                    status: current.status,
                    changed: false,
                })
            }
            Err(other) => Err(other),
        }
    }
}
