use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::super::models::ClientProfile;
use super::super::repositories::ClientRepository;
use crate::core::{Currency, Result};

/// Admin endpoints for client profile management
pub struct ClientController {
    repo: Arc<ClientRepository>,
}

impl ClientController {
    pub fn new(repo: Arc<ClientRepository>) -> Self {
        Self { repo }
    }

    pub fn configure(cfg: &mut web::ServiceConfig, repo: Arc<ClientRepository>) {
        let controller = web::Data::new(Self::new(repo));

        cfg.service(
            web::scope("/clients")
                .app_data(controller)
                .service(list_clients)
                .service(create_client)
                .service(update_currency)
                .service(toggle_status),
        );
    }
}

#[derive(Debug, Deserialize)]
struct UpdateCurrencyRequest {
    currency: Currency,
}

#[derive(Debug, Deserialize)]
struct CreateClientRequest {
    client_id: String,
    company_name: String,
    contact_email: String,
    phone_number: Option<String>,
    currency: Option<Currency>,
}

/// GET /clients — list all client profiles
#[get("")]
async fn list_clients(controller: web::Data<ClientController>) -> Result<HttpResponse> {
    let clients = controller.repo.list().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "clients": clients })))
}

/// POST /clients — register a new client profile
#[post("")]
async fn create_client(
    body: web::Json<CreateClientRequest>,
    controller: web::Data<ClientController>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let profile = ClientProfile::new(
        request.client_id,
        request.company_name,
        request.contact_email,
        request.phone_number,
        request.currency.unwrap_or(Currency::IDR),
    )?;
    let profile = controller.repo.create(&profile).await?;

    info!(client_id = %profile.client_id, company = %profile.company_name, "Client profile created");

    Ok(HttpResponse::Created().json(serde_json::json!({ "client": profile })))
}

/// POST /clients/{client_id}/currency — set the billing currency preference
#[post("/{client_id}/currency")]
async fn update_currency(
    path: web::Path<String>,
    body: web::Json<UpdateCurrencyRequest>,
    controller: web::Data<ClientController>,
) -> Result<HttpResponse> {
    let client_id = path.into_inner();
    controller
        .repo
        .update_currency(&client_id, body.currency)
        .await?;

    info!(client_id = %client_id, currency = %body.currency, "Client currency updated");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "client_id": client_id,
        "currency": body.currency,
    })))
}

/// POST /clients/{client_id}/toggle-status — flip the active flag
#[post("/{client_id}/toggle-status")]
async fn toggle_status(
    path: web::Path<String>,
    controller: web::Data<ClientController>,
) -> Result<HttpResponse> {
    let client_id = path.into_inner();
    let active = controller.repo.toggle_active(&client_id).await?;

    info!(client_id = %client_id, active, "Client status toggled");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "client_id": client_id,
        "active": active,
    })))
}
