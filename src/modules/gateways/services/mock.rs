use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;

use tracing::debug;

use super::gateway_trait::{GatewayStatus, PaymentGateway, PaymentRequest, PaymentResponse};
use crate::core::{AppError, Result};

/// Chance that a pending mock charge resolves to COMPLETED on first poll
const SUCCESS_RATE: f64 = 0.8;

#[derive(Debug, Clone)]
struct MockCharge {
    reference_id: String,
    amount: Decimal,
    status: String,
}

/// In-memory stand-in for the payment gateway.
///
/// Charges start PENDING and resolve on the first status poll with a fixed
/// success rate. The RNG is seedable so tests get deterministic outcomes,
/// and `force_complete` mirrors the admin backdoor of the real sandbox.
pub struct MockGateway {
    state: Mutex<MockGatewayState>,
}

struct MockGatewayState {
    charges: HashMap<String, MockCharge>,
    rng: StdRng,
}

impl MockGateway {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: Mutex::new(MockGatewayState {
                charges: HashMap::new(),
                rng,
            }),
        }
    }

    /// Force a charge COMPLETED regardless of the simulated outcome
    pub async fn force_complete(&self, channel_trx_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let charge = state
            .charges
            .get_mut(channel_trx_id)
            .ok_or_else(|| AppError::not_found(format!("Charge '{}' not found", channel_trx_id)))?;

        charge.status = "COMPLETED".to_string();
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        let channel_trx_id = format!("mock_{}", uuid::Uuid::new_v4().simple());
        let payment_url = format!("https://mock-payment.local/pay/{}", channel_trx_id);

        let mut state = self.state.lock().await;
        state.charges.insert(
            channel_trx_id.clone(),
            MockCharge {
                reference_id: request.reference_id.clone(),
                amount: request.amount,
                status: "PENDING".to_string(),
            },
        );

        Ok(PaymentResponse {
            channel_trx_id: Some(channel_trx_id),
            payment_url: Some(payment_url),
        })
    }

    async fn fetch_status(&self, channel_trx_id: &str) -> Result<GatewayStatus> {
        let mut guard = self.state.lock().await;
        let MockGatewayState { charges, rng } = &mut *guard;

        let charge = charges
            .get_mut(channel_trx_id)
            .ok_or_else(|| AppError::not_found(format!("Charge '{}' not found", channel_trx_id)))?;

        if charge.status == "PENDING" {
            debug!(
                reference_id = %charge.reference_id,
                amount = %charge.amount,
                "Resolving pending mock charge"
            );
            let success = rng.gen_bool(SUCCESS_RATE);
            charge.status = if success { "COMPLETED" } else { "FAILED" }.to_string();
        }

        let failed = charge.status == "FAILED";
        Ok(GatewayStatus {
            status: charge.status.clone(),
            failure_code: failed.then(|| "MOCK_DECLINED".to_string()),
            failure_message: failed.then(|| "Simulated card decline".to_string()),
            payment_url: None,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
