//! Database module for the on-device SQLite store
//!
//! This module provides connection pooling, configuration, and health checks
//! for the local SQLite database that backs the user cache.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{env, str::FromStr, time::Duration};
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL (e.g. "sqlite://userbook.db" or "sqlite::memory:")
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: "sqlite://userbook.db")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Acquire timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://userbook.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            max_connections,
            connection_timeout,
        })
    }

    /// Configuration for a private in-memory database, used by tests
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 30,
        }
    }

    /// Whether the URL points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Initialize a SQLite connection pool
///
/// The database file is created when missing. An in-memory database lives
/// only as long as its connection, so such pools are pinned to a single
/// connection that is never recycled.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<SqlitePool>` - SQLite connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    info!("Initializing database connection pool");

    if !config.database_url.starts_with("sqlite:") {
        return Err(DatabaseError::Configuration(format!(
            "Unsupported database URL, expected a sqlite: URL: {}",
            config.database_url
        )));
    }

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let base_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connection_timeout));

    let pool_options = if config.is_in_memory() {
        base_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        base_options.max_connections(config.max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - SQLite connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the database answers, false otherwise
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Ok(true),
        Err(e) => {
            error!("Database health check failed: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_database_config_from_env() {
        let config = DatabaseConfig::from_env().expect("Failed to create database config");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connection_timeout, 30);
        assert_eq!(config.database_url, "sqlite://userbook.db");
    }

    #[test]
    #[serial]
    fn test_database_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite:///tmp/userbook-test.db");
            std::env::set_var("DATABASE_MAX_CONNECTIONS", "2");
            std::env::set_var("DATABASE_CONNECTION_TIMEOUT", "not-a-number");
        }

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite:///tmp/userbook-test.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connection_timeout, 30);
        assert!(!config.is_in_memory());

        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("DATABASE_MAX_CONNECTIONS");
            std::env::remove_var("DATABASE_CONNECTION_TIMEOUT");
        }
    }

    #[tokio::test]
    async fn test_in_memory_pool_is_healthy() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());

        let pool = init_pool(&config).await.unwrap();
        assert!(health_check(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_pool_reports_unhealthy() {
        let pool = init_pool(&DatabaseConfig::in_memory()).await.unwrap();
        pool.close().await;
        assert!(!health_check(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_configuration_error() {
        let config = DatabaseConfig {
            database_url: "postgres://not-sqlite".to_string(),
            max_connections: 1,
            connection_timeout: 1,
        };

        let err = init_pool(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Configuration(_)));
    }
}
