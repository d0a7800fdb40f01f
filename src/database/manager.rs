use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::project::UnknownStatus;

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt row: {0}")]
    Decode(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<UnknownStatus> for DatabaseError {
    fn from(err: UnknownStatus) -> Self {
        DatabaseError::Decode(err.to_string())
    }
}

/// Statements applied by `ensure_schema`, in order. Each one is idempotent.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        owner_email TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL CHECK (status IN ('PLANNED', 'ACTIVE', 'DONE')),
        is_public BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS projects_owner_updated_idx ON projects (owner_email, updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS projects_public_updated_idx ON projects (updated_at DESC) WHERE is_public",
];

/// Owns the connection pool for the projects database
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Connect using the configured DATABASE_URL
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the projects table and its indexes when missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn connect_requires_database_url() {
        let config = AppConfig::development().database;
        match DatabaseManager::connect(&config).await {
            Err(DatabaseError::ConfigMissing(name)) => assert_eq!(name, "DATABASE_URL"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected without a database url"),
        }
    }

    #[test]
    fn schema_statements_are_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "not idempotent: {statement}");
        }
    }

    #[test]
    fn unknown_status_maps_to_decode_error() {
        let err: DatabaseError = UnknownStatus("ARCHIVED".to_string()).into();
        assert!(matches!(err, DatabaseError::Decode(msg) if msg.contains("ARCHIVED")));
    }
}
