//! Catalog backend - aggregates a Google Sheet and a OneDrive share behind a
//! small HTTP API and serves the static frontend.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API under `/catalog` and `/auth`
//! - Microsoft Graph for OneDrive folder traversal (delegated OAuth token,
//!   persisted on disk so logins survive restarts)
//! - Google Sheets CSV export for the product table
//! - In-memory TTL cache in front of the image traversal

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_server::config::Config;
use catalog_server::routes;
use catalog_server::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration after the subscriber is up so config warnings
    // (e.g. missing Azure credentials) are not dropped
    let config = Config::from_env().expect("Failed to load configuration");

    let addr = config.socket_addr();
    let state = AppState::new(config);
    let app = routes::app(state);

    tracing::info!("catalog server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
