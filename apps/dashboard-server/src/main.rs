//! # ShopTools Dashboard Server
//!
//! ```text
//! dashboard-server [path/to/shoptools.toml]
//! ```
//!
//! Without an argument the config is read from the platform config dir,
//! then `SHOPTOOLS_*` environment variables are applied.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dashboard_server::{router, AppState};
use shoptools_db::{Database, DbConfig};
use shoptools_gateway::{AppConfig, LocalBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shoptools=debug,dashboard_server=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting ShopTools dashboard server...");

    // Load configuration
    let config = AppConfig::load(std::env::args().nth(1).map(PathBuf::from))?;
    info!(
        addr = %config.server.bind_address(),
        db_path = %config.database.path.display(),
        "Configuration loaded"
    );

    // Open database
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await?;

    let purged = db.auth_sessions().purge_expired(Utc::now()).await?;
    info!(purged, "Expired sessions removed");

    let backend = LocalBackend::from_config(db.clone(), &config);
    let app = router(AppState::new(backend, config.storage.max_upload_bytes));

    let addr: SocketAddr = config.server.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
