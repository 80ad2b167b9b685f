use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, warn};

use super::gateway_trait::{GatewayStatus, PaymentGateway, PaymentRequest, PaymentResponse};
use super::token_cache::AccessTokenCache;
use crate::config::GatewayConfig;
use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_RETRIES: u32 = 3;

/// Pivot payment gateway client.
///
/// Payment creation is authenticated with an HMAC body signature
/// (`appkey`/`appid`/`bodysign` headers); status polls use a bearer token
/// obtained from the access-token endpoint and held in [`AccessTokenCache`].
pub struct PivotClient {
    http: ClientWithMiddleware,
    config: GatewayConfig,
    token_cache: AccessTokenCache,
}

impl PivotClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AppError::HttpClient)?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            config,
            token_cache: AccessTokenCache::new(),
        })
    }

    /// URL-safe base64 HMAC-SHA256 over the exact JSON body.
    ///
    /// Escaped slashes are normalized first; the signed string must be the
    /// byte-identical body that goes on the wire.
    fn body_sign(&self, body_json: &str) -> String {
        let normalized = body_json.replace("\\/", "/");

        let mut mac = HmacSha256::new_from_slice(self.config.app_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(normalized.as_bytes());

        base64::engine::general_purpose::URL_SAFE.encode(mac.finalize().into_bytes())
    }

    /// Obtain a fresh access token from the gateway
    async fn request_token(&self) -> Result<(String, u64)> {
        let url = format!("{}/v1/access-token", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .header("X-MERCHANT-ID", &self.config.merchant_id)
            .header("X-MERCHANT-SECRET", &self.config.merchant_secret)
            .json(&json!({ "grantType": "client_credentials" }))
            .send()
            .await
            .map_err(|e| AppError::gateway(format!("Access token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::gateway(format!(
                "Access token request failed: HTTP {}",
                response.status()
            )));
        }

        let body: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::gateway(format!("Malformed access token response: {}", e)))?;

        if body.code != "00" {
            return Err(AppError::gateway(format!(
                "Access token rejected: {} ({})",
                body.message, body.code
            )));
        }

        let expires_in = body.data.expires_in.parse::<u64>().unwrap_or(900);
        Ok((body.data.access_token, expires_in))
    }
}

#[async_trait]
impl PaymentGateway for PivotClient {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        let url = format!("{}/api/transaction", self.config.base_url);

        let body = json!({
            "redirect_url": self.config.redirect_url,
            "user_id": request.email.as_deref().unwrap_or(&request.reference_id),
            "merchant_transaction_id": request.reference_id,
            "payment_method": "visa_master",
            "currency": request.currency.to_string(),
            "amount": request.amount,
            "item_name": request.description,
            "customer_name": request.customer_name,
            "email": request.email,
            "phone_number": request.phone_number,
            "country": "Indonesia",
            "notification_url": self.config.notify_url,
        });

        // Sign exactly the serialized string that is sent
        let body_json = serde_json::to_string(&body)?;
        let bodysign = self.body_sign(&body_json);

        debug!(reference_id = %request.reference_id, "Creating gateway payment");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("appkey", &self.config.app_key)
            .header("appid", &self.config.app_id)
            .header("bodysign", bodysign)
            .body(body_json)
            .send()
            .await
            .map_err(|e| match e {
                // Transport failures leave the local transaction PENDING;
                // only an explicit gateway rejection marks it FAILED
                reqwest_middleware::Error::Reqwest(e) => AppError::HttpClient(e),
                reqwest_middleware::Error::Middleware(e) => {
                    AppError::gateway(format!("Pivot request failed: {}", e))
                }
            })?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let message = payload
                .get("message")
                .or_else(|| payload.get("error"))
                .and_then(|v| v.as_str())
                .unwrap_or("payment creation rejected");
            return Err(AppError::gateway(format!(
                "Pivot payment creation failed: HTTP {} ({})",
                status.as_u16(),
                message
            )));
        }

        // Providers have shipped the URL under several keys; accept all of them
        let payment_url = ["payment_url", "redirect_url"]
            .iter()
            .find_map(|key| {
                payload
                    .get(key)
                    .or_else(|| payload.get("data").and_then(|d| d.get(key)))
                    .and_then(|v| v.as_str())
            })
            .map(str::to_string);

        let channel_trx_id = payload
            .get("transaction_id")
            .or_else(|| payload.get("data").and_then(|d| d.get("id")))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(PaymentResponse {
            channel_trx_id,
            payment_url,
        })
    }

    async fn fetch_status(&self, channel_trx_id: &str) -> Result<GatewayStatus> {
        let token = self
            .token_cache
            .get_or_refresh(|| self.request_token())
            .await?;

        let url = format!("{}/v2/payments/{}", self.config.base_url, channel_trx_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::gateway(format!("Status poll failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Stale token; drop it so the next poll re-authenticates
            self.token_cache.invalidate().await;
            warn!(channel_trx_id, "Gateway rejected access token, cache invalidated");
        }

        if !response.status().is_success() {
            return Err(AppError::gateway(format!(
                "Status poll failed: HTTP {}",
                response.status()
            )));
        }

        let body: PaymentStatusResponse = response
            .json()
            .await
            .map_err(|e| AppError::gateway(format!("Malformed status response: {}", e)))?;

        if body.code != "00" {
            return Err(AppError::gateway(format!(
                "Status poll rejected: {} ({})",
                body.message, body.code
            )));
        }

        let charge = body.data.charge_details.and_then(|mut c| {
            if c.is_empty() {
                None
            } else {
                Some(c.remove(0))
            }
        });

        Ok(GatewayStatus {
            status: body.data.status,
            failure_code: charge.as_ref().and_then(|c| c.failure_code.clone()),
            failure_message: charge.and_then(|c| c.failure_message),
            payment_url: body.data.payment_url,
        })
    }

    fn name(&self) -> &str {
        "pivot"
    }
}

// Pivot API response structures

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    code: String,
    message: String,
    data: AccessTokenData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenData {
    access_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct PaymentStatusResponse {
    code: String,
    message: String,
    data: PaymentStatusData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentStatusData {
    status: String,
    payment_url: Option<String>,
    charge_details: Option<Vec<ChargeDetail>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChargeDetail {
    failure_code: Option<String>,
    failure_message: Option<String>,
}
