pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{PaymentPurpose, Transaction, TransactionStatus, TransactionType};
pub use repositories::TransactionRepository;
pub use services::{PaymentReconciler, PaymentService};
