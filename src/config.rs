use std::env;
use std::time::Duration;

use crate::db::PoolSettings;

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub pool: PoolSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "blog.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            pool: PoolSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pool = PoolSettings {
            max_size: lookup("DATABASE_POOL_SIZE")
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.pool.max_size),
            timeout: lookup("DATABASE_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool.timeout),
        };

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            pool,
        }
    }
}
