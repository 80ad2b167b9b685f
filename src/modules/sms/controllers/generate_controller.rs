use actix_web::{post, web, HttpResponse};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::core::Result;
use crate::modules::sms::services::{MockSmsGenerator, StatusMix, TimeWindow};

/// Admin endpoint that seeds a client with synthetic SMS traffic
pub struct GenerateController {
    generator: Arc<MockSmsGenerator>,
    default_unit_price: Decimal,
}

impl GenerateController {
    pub fn new(generator: Arc<MockSmsGenerator>, default_unit_price: Decimal) -> Self {
        Self {
            generator,
            default_unit_price,
        }
    }

    pub fn configure(
        cfg: &mut web::ServiceConfig,
        generator: Arc<MockSmsGenerator>,
        default_unit_price: Decimal,
    ) {
        let controller = web::Data::new(Self::new(generator, default_unit_price));

        cfg.service(
            web::scope("/admin")
                .app_data(controller)
                .service(generate_billing),
        );
    }
}

#[derive(Debug, Deserialize)]
struct PercentageSet {
    delivered: f64,
    undelivered: f64,
    failed: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    client_id: String,
    count: u64,
    unit_price: Option<Decimal>,
    #[serde(default)]
    time_range: Option<TimeWindow>,
    /// Three-way outcome split; takes priority over `failed_percentage`
    percentages: Option<PercentageSet>,
    /// Legacy single failure percentage
    failed_percentage: Option<f64>,
}

/// POST /admin/generate-billing
#[post("/generate-billing")]
async fn generate_billing(
    body: web::Json<GenerateRequest>,
    controller: web::Data<GenerateController>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let mix = match request.percentages {
        Some(p) => StatusMix::ThreeWay {
            delivered: p.delivered,
            undelivered: p.undelivered,
            failed: p.failed,
        },
        None => StatusMix::Legacy {
            failed_percentage: request.failed_percentage.unwrap_or(0.0),
        },
    };

    let unit_price = request.unit_price.unwrap_or(controller.default_unit_price);
    let window = request.time_range.unwrap_or_default();

    let mut rng = StdRng::from_entropy();
    let summary = controller
        .generator
        .generate(
            &request.client_id,
            request.count,
            unit_price,
            window,
            mix,
            &mut rng,
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "summary": summary,
    })))
}
