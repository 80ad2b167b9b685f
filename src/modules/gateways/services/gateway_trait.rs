use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{Currency, Result};

/// Payment gateway client surface.
///
/// `create_payment` registers a charge and returns the hosted payment URL;
/// `fetch_status` polls the gateway-side state of an earlier charge.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse>;

    async fn fetch_status(&self, channel_trx_id: &str) -> Result<GatewayStatus>;

    /// Gateway name used in logs and error messages
    fn name(&self) -> &str;
}

/// Payment creation request data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Merchant reference id (unique per payment)
    pub reference_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Payment creation response from the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Gateway-side transaction id, when the gateway assigns one upfront
    pub channel_trx_id: Option<String>,
    /// Hosted payment page for the customer
    pub payment_url: Option<String>,
}

/// Gateway-side view of a charge, as returned by a status poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStatus {
    /// Provider status string, e.g. "COMPLETED", "EXPIRED"
    pub status: String,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
    pub payment_url: Option<String>,
}
