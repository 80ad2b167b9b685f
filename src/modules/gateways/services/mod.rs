pub mod gateway_trait;
pub mod mock;
pub mod pivot;
pub mod token_cache;

pub use gateway_trait::{GatewayStatus, PaymentGateway, PaymentRequest, PaymentResponse};
pub use mock::MockGateway;
pub use pivot::PivotClient;
pub use token_cache::AccessTokenCache;
