use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::{signal, sync::oneshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use warehouse_api::config::AppConfig;
use warehouse_api::database::models::ProductValidator;
use warehouse_api::database::{DatabaseManager, PgProductRepository};
use warehouse_api::AppState;

/// Upper bound on closing the pool once the grace period has run out.
const FORCED_CLOSE_LIMIT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!("Starting Warehouse API in {:?} mode", config.environment);

    if config.security.api_key.is_none() {
        warn!("API_KEY is not set; POST/PUT/DELETE /products will answer 500 until it is configured");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::ensure_schema(&pool)
        .await
        .context("failed to prepare database schema")?;

    let state = AppState::new(
        Arc::new(PgProductRepository::new(pool.clone())),
        ProductValidator::new(),
        config.security.api_key.clone(),
    );
    let app = warehouse_api::app(state, &config.api);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Warehouse API listening on http://{}", addr);

    // Fires once the shutdown signal arrives, starting the grace period
    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = draining_tx.send(());
        })
        .into_future();

    let grace_expired = async move {
        if draining_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.context("server error")?;
            info!("All connections drained");
            DatabaseManager::close(pool).await;
        }
        _ = grace_expired => {
            warn!("In-flight requests still running after {:?}; forcing shutdown", grace);
            // Spawned connection tasks may still hold pool connections
            DatabaseManager::close_within(pool, FORCED_CLOSE_LIMIT).await;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
