use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use super::super::services::{PaymentReconciler, WebhookNotification};
use crate::core::Result;

/// Inbound payment-gateway webhook endpoint.
///
/// Unauthenticated at this layer: trust comes from the surrounding network
/// or shared-secret arrangement.
pub struct WebhookController {
    reconciler: Arc<PaymentReconciler>,
}

impl WebhookController {
    pub fn new(reconciler: Arc<PaymentReconciler>) -> Self {
        Self { reconciler }
    }

    pub fn configure(cfg: &mut web::ServiceConfig, reconciler: Arc<PaymentReconciler>) {
        let controller = web::Data::new(Self::new(reconciler));

        cfg.service(
            web::scope("/payments/notify")
                .app_data(controller)
                .service(notify),
        );
    }
}

/// POST /payments/notify
#[post("")]
async fn notify(
    body: web::Json<WebhookNotification>,
    controller: web::Data<WebhookController>,
) -> Result<HttpResponse> {
    let notification = body.into_inner();

    let outcome = controller.reconciler.apply_webhook(&notification).await?;

    info!(
        transaction_id = %outcome.transaction_id,
        status = %outcome.status,
        changed = outcome.changed,
        "Webhook processed"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "outcome": outcome,
    })))
}
