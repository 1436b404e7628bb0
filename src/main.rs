use lead_scoring_api::config::Config;
use lead_scoring_api::handlers::{self, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, makes sure the lead store has
/// its header row, then serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_scoring_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let state = AppState::new(config.clone())?;
    state.store.init().await?;
    tracing::info!("Lead store ready at {}", state.store.path().display());

    let app = handlers::router(Arc::new(state));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
