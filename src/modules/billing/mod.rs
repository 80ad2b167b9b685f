pub mod controllers;
pub mod models;
pub mod services;

pub use models::MonthlySummary;
pub use services::BillingAggregator;
