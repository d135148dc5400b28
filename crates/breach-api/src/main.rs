//! Breach Protocol API server entry point.

use std::error::Error;
use std::sync::Arc;

use breach_api::config::ServerConfig;
use breach_api::error::AppError;
use breach_api::state::AppState;
use breach_api::telemetry;
use breach_content::domain::catalog::load_catalog;
use breach_core::clock::SystemClock;
use breach_relay::AnthropicRelay;
use breach_store::{InMemoryEventRepository, InMemorySettingsStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    let tracer_provider = telemetry::init()?;
    info!("Starting Breach Protocol API server");
    if let Err(e) = dotenv {
        info!(reason = %e, "no .env file loaded");
    }

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    let catalog = Arc::new(load_catalog(config.catalog_path.as_deref()).map_err(AppError::Catalog)?);

    if config.relay.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; /api/ai will answer 502");
    }
    let relay = AnthropicRelay::new(config.relay.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Build application state.
    let app_state = AppState::new(
        catalog,
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(InMemorySettingsStore::new()),
        Arc::new(relay),
    );
    let app = breach_api::app(app_state);

    // Start server.
    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Server)?;

    axum::serve(listener, app).await.map_err(AppError::Server)?;

    if let Some(Err(e)) = tracer_provider.map(|provider| provider.shutdown()) {
        warn!(error = %e, "failed to flush traces");
    }

    Ok(())
}
