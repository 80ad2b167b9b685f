mod payment_controller;
mod webhook_controller;

pub use payment_controller::PaymentController;
pub use webhook_controller::WebhookController;
