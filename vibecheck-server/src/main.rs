//! vibecheck-server entry point
//!
//! Loads configuration from the environment (and any local .env file),
//! initializes tracing, and runs the HTTP server until shutdown.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use vibecheck_server::{serve, ServerConfig};

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing().ok();

    let config = ServerConfig::from_env();
    serve(config).await
}
