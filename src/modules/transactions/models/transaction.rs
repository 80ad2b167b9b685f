use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Ledger entry type. Amounts are signed: CREDIT/PAYMENT amounts are
/// positive, DEBIT/REFUND negative by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Credit,
    Debit,
    Payment,
    Refund,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "CREDIT"),
            TransactionType::Debit => write!(f, "DEBIT"),
            TransactionType::Payment => write!(f, "PAYMENT"),
            TransactionType::Refund => write!(f, "REFUND"),
        }
    }
}

/// Payment transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    /// Terminal statuses never change again; reversals are separate
    /// REFUND transactions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
            TransactionStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// What a PAYMENT is for. Top-ups credit the display balance on
/// completion; billing payments settle a monthly invoice and leave the
/// balance alone. Kept as an explicit tag so the two post-completion
/// effects can never be crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentPurpose {
    TopUp,
    Billing,
}

/// A money movement on a client's account.
///
/// Created PENDING by payment initiation; moved to a terminal status by the
/// reconciler (webhook or poll). Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: String,
    pub client_id: String,
    pub amount: Decimal,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub purpose: PaymentPurpose,
    pub status: TransactionStatus,
    pub description: String,
    /// Merchant reference id sent to the gateway (unique per payment)
    pub reference_id: Option<String>,
    /// Gateway-side transaction id, set once the gateway acknowledges
    pub channel_trx_id: Option<String>,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a new PENDING payment
    pub fn new_payment(
        client_id: String,
        amount: Decimal,
        purpose: PaymentPurpose,
        description: String,
        reference_id: String,
    ) -> Result<Self> {
        if client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID cannot be empty"));
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Amount must be greater than 0"));
        }
        if reference_id.trim().is_empty() {
            return Err(AppError::validation("Reference ID cannot be empty"));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            amount,
            tx_type: TransactionType::Payment,
            purpose,
            status: TransactionStatus::Pending,
            description,
            reference_id: Some(reference_id),
            channel_trx_id: None,
            failure_code: None,
            failure_message: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
