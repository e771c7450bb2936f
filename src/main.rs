//! # payroll-engine: Binary Entry Point
//!
//! Starts the Axum HTTP server for the payroll API.
//! Reads policy from `PAYROLL_CONFIG_DIR` (default `./config/default`),
//! seeds the repository from the snapshot directory in `PAYROLL_DATA_DIR`
//! when set, and binds to `PORT` (default 8080).

use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::store::InMemoryRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| "./config/default".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = ConfigLoader::load(&config_dir).map_err(|e| {
        tracing::error!("Failed to load payroll policy from {config_dir}: {e}");
        e
    })?;
    tracing::info!(config_dir = %config_dir, "Payroll policy loaded");

    let repository = match std::env::var("PAYROLL_DATA_DIR") {
        Ok(data_dir) => {
            let repository = InMemoryRepository::load_snapshot(&data_dir).map_err(|e| {
                tracing::error!("Failed to load snapshot from {data_dir}: {e}");
                e
            })?;
            tracing::info!(data_dir = %data_dir, "Repository seeded from snapshot");
            repository
        }
        Err(_) => {
            tracing::warn!(
                "PAYROLL_DATA_DIR not set; /payroll/run has no employees until one is provided"
            );
            InMemoryRepository::new()
        }
    };

    let app = create_router(AppState::new(config, Arc::new(repository)));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Payroll engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
