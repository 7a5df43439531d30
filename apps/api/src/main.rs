//! # Folio API Server
//!
//! ```text
//! load config ─► open SQLite (migrations) ─► wire ShopServices
//!     ─► subscribe AdminAlert + InventorySimulation ─► serve until signal
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use folio_api::{build_router, init_tracing, ApiConfig, AppState, JwtManager, TOKEN_LIFETIME_SECS};
use folio_db::{Database, DbConfig};
use folio_shop::{AdminAlert, InventorySimulation, ShopServices, SqliteStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Folio API server...");

    let config = ApiConfig::load()?;
    info!(
        addr = %config.bind_addr,
        db = %config.database_path.display(),
        notify_mode = %config.notify_mode,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let shop_config = config.shop_config();
    let store = SqliteStore::new(db.clone(), shop_config.retry.clone());
    let shop = ShopServices::from_store(store, shop_config);

    shop.dispatcher.subscribe(Arc::new(AdminAlert)).await;
    shop.dispatcher.subscribe(Arc::new(InventorySimulation::new())).await;

    let state = Arc::new(AppState {
        shop,
        jwt: JwtManager::new(config.jwt_secret.clone(), TOKEN_LIFETIME_SECS),
        db: Some(db.clone()),
    });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "HTTP server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
