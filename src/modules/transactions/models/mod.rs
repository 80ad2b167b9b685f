mod transaction;

pub use transaction::{PaymentPurpose, Transaction, TransactionStatus, TransactionType};
