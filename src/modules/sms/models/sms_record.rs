use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// SMS delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SmsStatus {
    /// Accepted, awaiting delivery report
    Pending,
    /// Handed to the carrier, no delivery report yet
    Sent,
    /// Delivery report received
    Delivered,
    /// Rejected or expired
    Failed,
}

impl SmsStatus {
    /// Only non-failed traffic is billable
    pub fn is_billable(&self) -> bool {
        matches!(self, SmsStatus::Sent | SmsStatus::Delivered)
    }
}

impl std::fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmsStatus::Pending => write!(f, "PENDING"),
            SmsStatus::Sent => write!(f, "SENT"),
            SmsStatus::Delivered => write!(f, "DELIVERED"),
            SmsStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for SmsStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SmsStatus::Pending),
            "SENT" => Ok(SmsStatus::Sent),
            "DELIVERED" => Ok(SmsStatus::Delivered),
            "FAILED" => Ok(SmsStatus::Failed),
            _ => Err(format!("Invalid SMS status: {}", s)),
        }
    }
}

/// One SMS delivery record.
///
/// Created in bulk by the mock generator (or the real gateway in the
/// production path). Immutable afterwards except for the PENDING→terminal
/// status transition performed by the delivery-report collector.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SmsRecord {
    pub id: String,
    pub client_id: String,
    pub phone_number: String,
    pub message: String,
    pub status: SmsStatus,
    /// Whole-rupiah cost; zero for failed sends
    pub cost: Decimal,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SmsRecord {
    pub fn new(
        client_id: String,
        phone_number: String,
        message: String,
        status: SmsStatus,
        cost: Decimal,
        sent_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            phone_number,
            message,
            status,
            cost,
            sent_at,
            created_at,
        }
    }
}
