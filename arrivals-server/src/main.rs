use std::net::SocketAddr;

use arrivals_server::config::ServerConfig;
use arrivals_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "configuration loaded");

    let state = AppState::from_context(&config.context);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(role = %config.context.role, "arrivals gateway listening on http://{addr}");
    tracing::info!("  GET  /                  - Liveness");
    tracing::info!("  GET  /healthz, /health  - Health check");
    tracing::info!("  GET  /api/v1/arrivals   - Arrivals (x-api-key required)");
    tracing::info!("  GET  /public/arrivals   - Arrivals");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
