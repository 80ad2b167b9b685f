use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use super::super::services::InvoiceRenderer;
use crate::core::{BillingPeriod, Result};
use crate::modules::billing::BillingAggregator;

/// Invoice derivation endpoint.
///
/// Built purely from the aggregation output plus the client profile; the
/// JSON form carries the figures, the text form is the printable document.
pub struct InvoiceController {
    aggregator: Arc<BillingAggregator>,
}

impl InvoiceController {
    pub fn new(aggregator: Arc<BillingAggregator>) -> Self {
        Self { aggregator }
    }

    pub fn configure(cfg: &mut web::ServiceConfig, aggregator: Arc<BillingAggregator>) {
        let controller = web::Data::new(Self::new(aggregator));

        cfg.service(
            web::scope("/invoices")
                .app_data(controller)
                .service(get_invoice)
                .service(get_invoice_text),
        );
    }
}

#[derive(Debug, Deserialize)]
struct InvoiceQuery {
    client_id: String,
    month: u32,
    year: i32,
}

/// GET /invoices?client_id=&month=&year=
#[get("")]
async fn get_invoice(
    query: web::Query<InvoiceQuery>,
    controller: web::Data<InvoiceController>,
) -> Result<HttpResponse> {
    let period = BillingPeriod::new(query.month, query.year)?;
    let (summary, profile) = controller
        .aggregator
        .summarize(&query.client_id, period)
        .await?;

    let document = InvoiceRenderer::derive(&summary, &profile)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "invoice": document })))
}

/// GET /invoices/text?client_id=&month=&year= — printable plain-text form
#[get("/text")]
async fn get_invoice_text(
    query: web::Query<InvoiceQuery>,
    controller: web::Data<InvoiceController>,
) -> Result<HttpResponse> {
    let period = BillingPeriod::new(query.month, query.year)?;
    let (summary, profile) = controller
        .aggregator
        .summarize(&query.client_id, period)
        .await?;

    let document = InvoiceRenderer::derive(&summary, &profile)?;
    let text = InvoiceRenderer::render_text(&document);

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .append_header((
            "Content-Disposition",
            format!(
                "attachment; filename=\"invoice_{}_{:02}.txt\"",
                document.year, document.month
            ),
        ))
        .body(text))
}
