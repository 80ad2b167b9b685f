use crate::core::{AppError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Default per-SMS price in whole rupiah, used when a generation
    /// request does not carry an explicit unit price
    pub default_unit_price: Decimal,
}

/// Which gateway client to wire up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayDriver {
    /// Real Pivot integration
    Pivot,
    /// In-memory simulator for development and demos
    Mock,
}

/// Payment gateway credentials and endpoints.
///
/// `app_key`/`app_id`/`app_secret` sign payment-creation requests;
/// `merchant_id`/`merchant_secret` obtain the access token used for
/// status polls. Credentials are only required for the pivot driver.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub driver: GatewayDriver,
    pub base_url: String,
    pub app_key: String,
    pub app_id: String,
    pub app_secret: String,
    pub merchant_id: String,
    pub merchant_secret: String,
    pub notify_url: String,
    pub redirect_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                default_unit_price: env::var("SMS_UNIT_PRICE")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid SMS_UNIT_PRICE".to_string()))?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            gateway: GatewayConfig {
                driver: match env::var("GATEWAY_DRIVER")
                    .unwrap_or_else(|_| "pivot".to_string())
                    .to_lowercase()
                    .as_str()
                {
                    "pivot" => GatewayDriver::Pivot,
                    "mock" => GatewayDriver::Mock,
                    other => {
                        return Err(AppError::Configuration(format!(
                            "Unknown GATEWAY_DRIVER '{}'",
                            other
                        )))
                    }
                },
                base_url: env::var("GATEWAY_BASE_URL")
                    .unwrap_or_else(|_| "https://sandbox-payment.pivot-payment.com".to_string()),
                app_key: env::var("GATEWAY_APP_KEY").unwrap_or_default(),
                app_id: env::var("GATEWAY_APP_ID").unwrap_or_default(),
                app_secret: env::var("GATEWAY_APP_SECRET").unwrap_or_default(),
                merchant_id: env::var("GATEWAY_MERCHANT_ID").unwrap_or_default(),
                merchant_secret: env::var("GATEWAY_MERCHANT_SECRET").unwrap_or_default(),
                notify_url: env::var("GATEWAY_NOTIFY_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/api/payments/notify".to_string()),
                redirect_url: env::var("GATEWAY_REDIRECT_URL")
                    .unwrap_or_else(|_| "http://localhost:8080/client/summary".to_string()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.default_unit_price <= Decimal::ZERO {
            return Err(AppError::Configuration(
                "SMS unit price must be greater than 0".to_string(),
            ));
        }

        if self.gateway.base_url.is_empty() {
            return Err(AppError::Configuration(
                "Gateway base URL must not be empty".to_string(),
            ));
        }

        if self.gateway.driver == GatewayDriver::Pivot {
            for (name, value) in [
                ("GATEWAY_APP_KEY", &self.gateway.app_key),
                ("GATEWAY_APP_ID", &self.gateway.app_id),
                ("GATEWAY_APP_SECRET", &self.gateway.app_secret),
                ("GATEWAY_MERCHANT_ID", &self.gateway.merchant_id),
                ("GATEWAY_MERCHANT_SECRET", &self.gateway.merchant_secret),
            ] {
                if value.is_empty() {
                    return Err(AppError::Configuration(format!("{} not set", name)));
                }
            }
        }

        Ok(())
    }
}
