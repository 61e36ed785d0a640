//! Roster engine HTTP server.
//!
//! Environment:
//! - `ROSTER_CONFIG_DIR`: unit configuration directory (default `config/general_ward`)
//! - `ROSTER_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `RUST_LOG`: tracing filter (default `roster_engine=info`)

use std::env;
use std::net::SocketAddr;

use roster_engine::api::{AppState, create_router};
use roster_engine::config::ConfigLoader;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "config/general_ward";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster_engine=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_dir = env::var("ROSTER_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let config = ConfigLoader::load(&config_dir)?;
    tracing::info!(
        unit = %config.settings().metadata().name,
        config_dir = %config_dir,
        "Unit configuration loaded"
    );

    let addr: SocketAddr = env::var("ROSTER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.into())
        .parse()?;
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
