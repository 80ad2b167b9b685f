use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::core::{AppError, Currency, Result};

/// Client billing profile, one-to-one with a client identity.
///
/// `balance` is display state maintained by the top-up flow; monthly billing
/// figures are always recomputed from SMS and transaction records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientProfile {
    pub id: String,
    pub client_id: String,
    pub company_name: String,
    pub contact_email: String,
    pub phone_number: Option<String>,
    pub balance: Decimal,
    pub active: bool,
    pub currency: String,
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ClientProfile {
    pub fn new(
        client_id: String,
        company_name: String,
        contact_email: String,
        phone_number: Option<String>,
        currency: Currency,
    ) -> Result<Self> {
        if client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID cannot be empty"));
        }
        if company_name.trim().is_empty() {
            return Err(AppError::validation("Company name cannot be empty"));
        }
        if contact_email.trim().is_empty() {
            return Err(AppError::validation("Contact email cannot be empty"));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_id,
            company_name,
            contact_email,
            phone_number,
            balance: Decimal::ZERO,
            active: true,
            currency: currency.to_string(),
            created_at: Some(Utc::now()),
        })
    }

    /// Billing currency preference
    pub fn get_currency(&self) -> Result<Currency> {
        Currency::from_str(&self.currency)
            .map_err(|e| AppError::Internal(format!("Invalid currency: {}", e)))
    }
}
