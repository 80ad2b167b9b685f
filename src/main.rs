use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smsbilling::config::{Config, GatewayDriver};
use smsbilling::modules::billing::{controllers::SummaryController, BillingAggregator};
use smsbilling::modules::clients::{controllers::ClientController, ClientRepository};
use smsbilling::modules::gateways::{MockGateway, PaymentGateway, PivotClient};
use smsbilling::modules::invoices::controllers::InvoiceController;
use smsbilling::modules::sms::{
    controllers::{GenerateController, SmsLogController},
    MockSmsGenerator, SmsRepository,
};
use smsbilling::modules::transactions::{
    controllers::{PaymentController, WebhookController},
    PaymentReconciler, PaymentService, TransactionRepository,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smsbilling=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting SMS billing service");
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized (max {} connections)",
        config.database.max_connections
    );

    // Repositories
    let client_repo = Arc::new(ClientRepository::new(db_pool.clone()));
    let sms_repo = Arc::new(SmsRepository::new(db_pool.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(db_pool.clone()));

    // Gateway client and services
    let gateway: Arc<dyn PaymentGateway> = match config.gateway.driver {
        GatewayDriver::Pivot => Arc::new(
            PivotClient::new(config.gateway.clone()).context("Failed to build gateway client")?,
        ),
        GatewayDriver::Mock => {
            tracing::warn!("Using the in-memory mock payment gateway");
            Arc::new(MockGateway::default())
        }
    };
    let generator = Arc::new(MockSmsGenerator::new(client_repo.clone(), sms_repo.clone()));
    let aggregator = Arc::new(BillingAggregator::new(
        client_repo.clone(),
        sms_repo.clone(),
        transaction_repo.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        transaction_repo.clone(),
        client_repo.clone(),
        gateway.clone(),
    ));
    let reconciler = Arc::new(PaymentReconciler::new(
        transaction_repo.clone(),
        client_repo.clone(),
        gateway,
    ));

    let default_unit_price = config.app.default_unit_price;
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let server = HttpServer::new(move || {
        let client_repo = client_repo.clone();
        let sms_repo = sms_repo.clone();
        let transaction_repo = transaction_repo.clone();
        let generator = generator.clone();
        let aggregator = aggregator.clone();
        let payment_service = payment_service.clone();
        let reconciler = reconciler.clone();

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .configure(|cfg| ClientController::configure(cfg, client_repo.clone()))
                    .configure(|cfg| {
                        GenerateController::configure(cfg, generator.clone(), default_unit_price)
                    })
                    .configure(|cfg| SmsLogController::configure(cfg, sms_repo.clone()))
                    .configure(|cfg| SummaryController::configure(cfg, aggregator.clone()))
                    .configure(|cfg| InvoiceController::configure(cfg, aggregator.clone()))
                    .configure(|cfg| {
                        WebhookController::configure(cfg, reconciler.clone())
                    })
                    .configure(|cfg| {
                        PaymentController::configure(
                            cfg,
                            payment_service.clone(),
                            reconciler.clone(),
                            transaction_repo.clone(),
                        )
                    }),
            )
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "smsbilling"
    }))
}
