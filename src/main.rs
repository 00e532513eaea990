//! Vendora - A demonstration e-commerce platform

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendora::{
    api::{self, AppState},
    config::Config,
    db::{self, Stores},
    services::{AuthService, OrderService, PaymentService, TokenSigner},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendora=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vendora...");

    // Load configuration (file values, then environment overrides)
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", pool.kind());

    // Prepare schema for the active backend
    db::migrations::prepare(&pool).await?;
    tracing::info!("Database schema prepared");

    // Entity stores, bound once to the active backend
    let stores = Stores::new(&pool)?;

    let tokens = TokenSigner::new(&config.auth.token_secret, config.auth.token_ttl_hours);

    let state = AppState {
        pool: pool.clone(),
        auth_service: Arc::new(AuthService::new(stores.users.clone(), tokens.clone())),
        order_service: Arc::new(OrderService::new(stores.orders.clone())),
        payment_service: Arc::new(PaymentService::new(stores.payments.clone())),
        tokens,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
