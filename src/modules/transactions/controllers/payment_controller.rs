use actix_web::{get, post, web, HttpRequest, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use super::super::models::PaymentPurpose;
use super::super::repositories::TransactionRepository;
use super::super::services::{Caller, PaymentReconciler, PaymentService, TransactionLookup};
use crate::core::{AppError, BillingPeriod, Result};

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 500;

/// Payment initiation, status polling, and transaction listing
pub struct PaymentController {
    payment_service: Arc<PaymentService>,
    reconciler: Arc<PaymentReconciler>,
    transaction_repo: Arc<TransactionRepository>,
}

impl PaymentController {
    pub fn new(
        payment_service: Arc<PaymentService>,
        reconciler: Arc<PaymentReconciler>,
        transaction_repo: Arc<TransactionRepository>,
    ) -> Self {
        Self {
            payment_service,
            reconciler,
            transaction_repo,
        }
    }

    pub fn configure(
        cfg: &mut web::ServiceConfig,
        payment_service: Arc<PaymentService>,
        reconciler: Arc<PaymentReconciler>,
        transaction_repo: Arc<TransactionRepository>,
    ) {
        let controller = web::Data::new(Self::new(payment_service, reconciler, transaction_repo));

        cfg.service(
            web::scope("/payments")
                .app_data(controller)
                .service(create_payment)
                .service(check_status)
                .service(list_transactions)
                .service(get_payment),
        );
    }
}

/// Caller identity propagated by the authenticating frontend.
/// Session handling itself lives outside this service.
fn caller_from_headers(req: &HttpRequest) -> Result<Caller> {
    let client_id = req
        .headers()
        .get("X-Client-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| AppError::unauthorized("Missing X-Client-Id header"))?;

    let is_admin = req
        .headers()
        .get("X-Role")
        .and_then(|v| v.to_str().ok())
        .map(|role| role.eq_ignore_ascii_case("admin"))
        .unwrap_or(false);

    Ok(Caller {
        client_id,
        is_admin,
    })
}

#[derive(Debug, Deserialize)]
struct CreatePaymentRequest {
    client_id: String,
    amount: Decimal,
    purpose: PaymentPurpose,
    month: Option<u32>,
    year: Option<i32>,
}

/// POST /payments — create a PENDING payment and register it with the gateway
#[post("")]
async fn create_payment(
    body: web::Json<CreatePaymentRequest>,
    controller: web::Data<PaymentController>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let period = match (request.month, request.year) {
        (Some(month), Some(year)) => Some(BillingPeriod::new(month, year)?),
        _ => None,
    };

    let initiation = controller
        .payment_service
        .initiate(&request.client_id, request.amount, request.purpose, period)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "transaction": initiation.transaction,
        "payment_url": initiation.payment_url,
    })))
}

/// POST /payments/check-status — reconcile one transaction against the gateway
#[post("/check-status")]
async fn check_status(
    req: HttpRequest,
    body: web::Json<TransactionLookup>,
    controller: web::Data<PaymentController>,
) -> Result<HttpResponse> {
    let caller = caller_from_headers(&req)?;
    let lookup = body.into_inner();
    let outcome = controller.reconciler.check_status(&lookup, &caller).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "outcome": outcome,
    })))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

/// GET /payments — list the caller's transactions
#[get("")]
async fn list_transactions(
    req: HttpRequest,
    query: web::Query<ListQuery>,
    controller: web::Data<PaymentController>,
) -> Result<HttpResponse> {
    let caller = caller_from_headers(&req)?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let transactions = controller
        .transaction_repo
        .list_by_client(&caller.client_id, limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "transactions": transactions,
        "limit": limit,
        "offset": offset,
    })))
}

/// GET /payments/{id} — fetch one transaction (owner or admin only)
#[get("/{id}")]
async fn get_payment(
    req: HttpRequest,
    path: web::Path<String>,
    controller: web::Data<PaymentController>,
) -> Result<HttpResponse> {
    let caller = caller_from_headers(&req)?;
    let transaction = controller
        .payment_service
        .get_transaction(&path.into_inner(), &caller.client_id, caller.is_admin)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "transaction": transaction })))
}
