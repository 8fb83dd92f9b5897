use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection pool lifecycle: open at startup, bootstrap the schema, close on shutdown.
pub struct DatabaseManager;

impl DatabaseManager {
    const PRODUCTS_DDL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS products (
            id          BIGSERIAL PRIMARY KEY,
            name        TEXT        NOT NULL,
            price       BIGINT      NOT NULL,
            stock       BIGINT      NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#;

    /// Open the shared connection pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let target = Self::redacted_target(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!(
            "Created database pool for {} (max {} connections)",
            target, config.max_connections
        );
        Ok(pool)
    }

    /// Create the products table if this is a fresh database.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(Self::PRODUCTS_DDL).execute(pool).await?;
        info!("Schema ready: products");
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }

    /// Close the pool, but stop waiting after `limit` if connections are still
    /// checked out. Returns false when the limit was hit.
    pub async fn close_within(pool: PgPool, limit: Duration) -> bool {
        match tokio::time::timeout(limit, pool.close()).await {
            Ok(()) => {
                info!("Closed database pool");
                true
            }
            Err(_) => {
                warn!(
                    "Database pool still had {} connection(s) in use after {:?}; abandoning close",
                    pool.size().saturating_sub(pool.num_idle() as u32),
                    limit
                );
                false
            }
        }
    }

    /// host[:port]/database, without credentials or query, for logging.
    fn redacted_target(database_url: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        let host = url.host_str().unwrap_or("localhost");
        let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
        Ok(format!("{}{}{}", host, port, url.path()))
    }
}
