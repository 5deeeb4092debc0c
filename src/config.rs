use std::time::Duration;

use anyhow::Result;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Runtime settings.
///
/// Resolved from built-in defaults, then an optional `football.toml` in the
/// working directory, then `FOOTBALL_*` environment variables (a `.env` file
/// is loaded first if present).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Maximum number of cached token lookups
    pub token_cache_capacity: u64,
    /// Seconds a cached token lookup stays valid
    pub token_cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from `football.toml` and the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("football").required(false))
            .add_source(Environment::with_prefix("FOOTBALL"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("database_url", "sqlite://football.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("token_cache_capacity", 1000_i64)?
            .set_default("token_cache_ttl_secs", 300_i64)?
            .set_default("request_timeout_secs", 30_i64)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Connect to the database and build the shared application state
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    debug!(
        "Token cache: capacity {}, ttl {}s",
        config.token_cache_capacity, config.token_cache_ttl_secs
    );
    let token_cache = Cache::builder()
        .max_capacity(config.token_cache_capacity)
        .time_to_live(Duration::from_secs(config.token_cache_ttl_secs))
        .build();

    Ok(AppState::new(db, token_cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let config: AppConfig = AppConfig::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.database_url, "sqlite://football.db?mode=rwc");
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.token_cache_capacity, 1000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            bind_address = "127.0.0.1:8080"
            token_cache_ttl_secs = 60
        "#;
        let config: AppConfig = AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.token_cache_ttl_secs, 60);
        assert_eq!(config.database_url, "sqlite://football.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_initialize_app_state_in_memory() {
        let mut config: AppConfig = AppConfig::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        config.database_url = "sqlite::memory:".to_string();

        let state = initialize_app_state(&config).await.unwrap();
        assert!(state.db.ping().await.is_ok());
        assert_eq!(state.token_cache.entry_count(), 0);
    }
}
