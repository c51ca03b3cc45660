//! vibecheck-server: survey collection over HTTP
//!
//! Serves a question list, accepts scored submissions, and exposes
//! admin-only management and analytics endpoints backed by SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod state;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use state::AppState;

use crate::auth::SessionStore;
use crate::db::Database;

/// Build the application router with all routes
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::admin::router())
        .merge(routes::questions::router())
        .merge(routes::responses::router())
        .merge(routes::leaderboard::router())
        .merge(routes::analytics::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS layer for the configured origin; `*` allows any origin
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    if allowed_origin == "*" {
        warn!("CORS: permissive mode enabled, all origins allowed");
        return CorsLayer::permissive();
    }
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            warn!(origin = %allowed_origin, "Invalid CORS origin, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}

/// Open the database, seed defaults, and run the HTTP server
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    info!("Opening database at {}", config.db_path.display());
    let db = Database::open(&config.db_path).await?;
    db.seed(&auth::hash_password(&config.admin_password)).await?;

    let state = AppState::new(db, SessionStore::new());
    let app = build_router(state, cors_layer(&config.allowed_origin));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("vibecheck-server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting shutdown");
        }
    }
}
