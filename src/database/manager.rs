use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

/// Errors from the data-access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the connection pool from configuration
pub struct DatabaseManager;

impl DatabaseManager {
    /// Create a pool that connects on first use, so the server can start
    /// (and report degraded health) while the database is unreachable.
    pub fn connect_lazy(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let connection_string = Self::build_connection_string(&config.database.url, config.database_name())?;
        let options = PgConnectOptions::from_str(&connection_string).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect_lazy_with(options);

        info!("Configured database pool for: {}", config.database_name());
        Ok(pool)
    }

    /// Swap the database name in the URL path for the environment's database
    fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
