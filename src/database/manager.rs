use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Connection pool manager for the listings database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Get the shared pool, creating it lazily on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = POOL
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL")
                    .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

                let db_config = &crate::config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(db_config.max_connections)
                    .acquire_timeout(Duration::from_secs(db_config.connection_timeout_secs))
                    .connect(&url)
                    .await?;

                info!("Created database pool");
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
