pub mod services;

pub use services::{
    AccessTokenCache, GatewayStatus, MockGateway, PaymentGateway, PaymentRequest,
    PaymentResponse, PivotClient,
};
