// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over a loaded price engine
// Usage: cargo run --features api --bin api_server

use house_price_engine::{AppState, create_router};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "house_price_engine=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let artifact_dir = std::env::var("ARTIFACT_DIR")
        .unwrap_or_else(|_| "artifacts/demo".to_string());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(300);

    tracing::info!("Configuration:");
    tracing::info!("  ARTIFACT_DIR: {}", artifact_dir);
    tracing::info!("  PORT: {}", port);
    tracing::info!("  CACHE_TTL_SECS: {}", cache_ttl_secs);

    // Artifacts are loaded once; a bad artifact aborts startup
    let state = AppState::new(&artifact_dir, Duration::from_secs(cache_ttl_secs)).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
