//! Runtime settings
//!
//! Layered as defaults, then an optional `userbook.toml`, then environment
//! variables such as `USERBOOK_API__BASE_URL` or
//! `USERBOOK_STORE__DATABASE_URL`.
//!
//! Store defaults come from [`DatabaseConfig::from_env`], so `DATABASE_URL`,
//! `DATABASE_MAX_CONNECTIONS` and `DATABASE_CONNECTION_TIMEOUT` apply unless
//! the file or a `USERBOOK_STORE__*` variable overrides them.

use common::database::DatabaseConfig;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::remote::DEFAULT_TIMEOUT;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

impl StoreSettings {
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            connection_timeout: self.connection_timeout,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReachabilitySettings {
    pub probe_timeout_ms: u64,
}

impl ReachabilitySettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub store: StoreSettings,
    pub reachability: ReachabilitySettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let database =
            DatabaseConfig::from_env().map_err(|e| ConfigError::Message(e.to_string()))?;

        let config = Config::builder()
            .set_default("api.base_url", "http://localhost:8000/public/api")?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT.as_secs() as i64)?
            .set_default("store.database_url", database.database_url)?
            .set_default("store.max_connections", database.max_connections as i64)?
            .set_default("store.connection_timeout", database.connection_timeout as i64)?
            .set_default("reachability.probe_timeout_ms", 3000_i64)?
            .add_source(
                File::with_name("userbook.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("USERBOOK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_settings_defaults() {
        let settings = Settings::new().unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:8000/public/api");
        assert_eq!(settings.api.timeout(), Duration::from_secs(180));
        assert_eq!(settings.store.database_url, "sqlite://userbook.db");
        assert_eq!(settings.store.max_connections, 5);
        assert_eq!(settings.reachability.probe_timeout(), Duration::from_secs(3));
    }

    #[test]
    #[serial]
    fn test_settings_from_env() {
        unsafe {
            std::env::set_var("USERBOOK_API__BASE_URL", "https://users.example.com/public/api/");
            std::env::set_var("USERBOOK_API__TIMEOUT_SECS", "30");
            std::env::set_var("USERBOOK_STORE__DATABASE_URL", "sqlite::memory:");
        }

        let settings = Settings::new().unwrap();
        assert_eq!(settings.api.base_url, "https://users.example.com/public/api/");
        assert_eq!(settings.api.timeout_secs, 30);

        let database = settings.store.database_config();
        assert!(database.is_in_memory());
        assert_eq!(database.connection_timeout, 30);

        unsafe {
            std::env::remove_var("USERBOOK_API__BASE_URL");
            std::env::remove_var("USERBOOK_API__TIMEOUT_SECS");
            std::env::remove_var("USERBOOK_STORE__DATABASE_URL");
        }
    }

    #[test]
    #[serial]
    fn test_store_defaults_follow_database_env() {
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite://shared.db");
            std::env::set_var("DATABASE_MAX_CONNECTIONS", "2");
        }

        let settings = Settings::new().unwrap();
        assert_eq!(settings.store.database_url, "sqlite://shared.db");
        assert_eq!(settings.store.max_connections, 2);
        assert_eq!(settings.store.connection_timeout, 30);

        unsafe {
            std::env::set_var("USERBOOK_STORE__DATABASE_URL", "sqlite::memory:");
        }
        let settings = Settings::new().unwrap();
        assert_eq!(settings.store.database_url, "sqlite::memory:");
        assert_eq!(settings.store.max_connections, 2);

        unsafe {
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("DATABASE_MAX_CONNECTIONS");
            std::env::remove_var("USERBOOK_STORE__DATABASE_URL");
        }
    }
}
