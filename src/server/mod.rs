//! HTTP transport for the prediction service
//!
//! Thin layer over [`crate::service::PredictionService`]: routing, request
//! parsing, and status-code mapping. All prediction semantics live in the
//! core modules.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ApiError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::service::PredictionService;

/// Start the server with the given configuration.
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.models_dir)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        dataset = %config.dataset_path,
        models_dir = %config.models_dir,
        address = %addr,
        "Starting prediction service"
    );

    let state = Arc::new(AppState::new(PredictionService::new(config)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening");

    let shutdown_signal = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received, stopping server");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
