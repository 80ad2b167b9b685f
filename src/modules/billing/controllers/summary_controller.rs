use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use super::super::services::BillingAggregator;
use crate::core::{BillingPeriod, Result};

/// Monthly billing summary endpoint for the dashboards
pub struct SummaryController {
    aggregator: Arc<BillingAggregator>,
}

impl SummaryController {
    pub fn new(aggregator: Arc<BillingAggregator>) -> Self {
        Self { aggregator }
    }

    pub fn configure(cfg: &mut web::ServiceConfig, aggregator: Arc<BillingAggregator>) {
        let controller = web::Data::new(Self::new(aggregator));

        cfg.service(
            web::scope("/billing")
                .app_data(controller)
                .service(monthly_summary),
        );
    }
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    client_id: String,
    month: u32,
    year: i32,
}

/// GET /billing/summary?client_id=&month=&year=
#[get("/summary")]
async fn monthly_summary(
    query: web::Query<SummaryQuery>,
    controller: web::Data<SummaryController>,
) -> Result<HttpResponse> {
    let period = BillingPeriod::new(query.month, query.year)?;
    let (summary, profile) = controller
        .aggregator
        .summarize(&query.client_id, period)
        .await?;

    let (start, end) = period.utc_range();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "period": {
            "month": period.month,
            "year": period.year,
            "start": start,
            "end": end,
        },
        "currency": profile.currency,
        "totals": {
            "sms": summary.total_sms,
            "sent": summary.total_sent,
            "failed": summary.total_failed,
            "cost": summary.total_cost,
            "billed": summary.billed,
            "billed_from_transactions": summary.billed_from_transactions,
            "paid_in_period": summary.paid_in_period,
            "outstanding": summary.outstanding,
        },
    })))
}
