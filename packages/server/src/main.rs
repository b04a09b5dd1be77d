// Main entry point for the knowledge API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use knowledge::SqliteStore;
use moonshot_client::{EmbeddingClient, MoonshotClient};
use server_core::{build_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,knowledge=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting knowledge extraction API");

    // Load environment and configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to the store
    tracing::info!(database_url = %config.database_url, "Opening store...");
    let store = SqliteStore::new(&config.database_url)
        .await
        .context("Failed to open the knowledge store")?;
    tracing::info!("Store ready");

    // Model clients
    let chat = MoonshotClient::from_env().context("Failed to configure Moonshot client")?;
    let embedder =
        EmbeddingClient::from_env().context("Failed to configure embedding client")?;

    // Build application
    let state = AppState::new(Arc::new(store), Arc::new(chat), Arc::new(embedder))
        .with_max_content_chars(config.max_content_chars);
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
