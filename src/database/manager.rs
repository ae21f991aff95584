use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

const UNIQUE_VIOLATION: &str = "23505";

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                DatabaseError::UniqueViolation {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DatabaseError::Unavailable(err.to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

impl From<crate::filter::FilterError> for DatabaseError {
    fn from(err: crate::filter::FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// Owns the shared connection pool
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the bounded pool described by `config`. Connections are recycled
    /// after `max_lifetime_secs`.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = Self::pool_options(config).connect(&config.url).await?;
        info!(
            "Connected to {} (max_connections={})",
            Self::redacted_url(&config.url)?,
            config.max_connections
        );
        Ok(pool)
    }

    /// Same pool, but no connection is opened until first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        Ok(Self::pool_options(config).connect_lazy(&config.url)?)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }

    /// Connection string safe for logs: password replaced, query dropped.
    pub fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        url.set_query(None);
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_password_in_logged_url() {
        let s = DatabaseManager::redacted_url("postgres://pos:s3cret@db:5432/pos?sslmode=require").unwrap();
        assert_eq!(s, "postgres://pos:****@db:5432/pos");
        assert!(!s.contains("s3cret"));
    }

    #[test]
    fn url_without_password_is_unchanged() {
        let s = DatabaseManager::redacted_url("postgres://localhost/pos").unwrap();
        assert_eq!(s, "postgres://localhost/pos");
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            DatabaseManager::redacted_url("not a url"),
            Err(DatabaseError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            DatabaseError::from(sqlx::Error::PoolTimedOut),
            DatabaseError::Unavailable(_)
        ));
        assert!(matches!(
            DatabaseError::from(sqlx::Error::RowNotFound),
            DatabaseError::Sqlx(_)
        ));
    }
}
