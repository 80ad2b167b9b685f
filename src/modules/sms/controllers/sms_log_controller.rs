use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::Result;
use crate::modules::sms::repositories::SmsRepository;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 500;

/// Read-only SMS log listing for the dashboards
pub struct SmsLogController {
    repo: Arc<SmsRepository>,
}

impl SmsLogController {
    pub fn new(repo: Arc<SmsRepository>) -> Self {
        Self { repo }
    }

    pub fn configure(cfg: &mut web::ServiceConfig, repo: Arc<SmsRepository>) {
        let controller = web::Data::new(Self::new(repo));

        cfg.service(
            web::scope("/sms-logs")
                .app_data(controller)
                .service(list_logs),
        );
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    client_id: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

/// GET /sms-logs?client_id=&limit=&offset=
#[get("")]
async fn list_logs(
    query: web::Query<ListQuery>,
    controller: web::Data<SmsLogController>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let logs = controller
        .repo
        .list(query.client_id.as_deref(), limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "logs": logs,
        "limit": limit,
        "offset": offset,
    })))
}
