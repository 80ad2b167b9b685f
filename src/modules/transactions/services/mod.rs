pub mod payment_service;
pub mod reconciler;

pub use payment_service::{PaymentInitiation, PaymentService};
pub use reconciler::{
    plan_transition, resolve_poll_status, resolve_webhook_status, Caller, PaymentReconciler,
    ReconcileOutcome, TransactionLookup, WebhookNotification,
};
