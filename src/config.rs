//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::storage::DEFAULT_CACHE_CAPACITY;

// == Cache Backend Kind ==
/// Which cache backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    /// In-process map with least-used eviction
    #[default]
    Memory,
    /// External Redis service
    Redis,
    /// Cache disabled; every lookup goes to the durable store
    Off,
}

impl CacheBackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            "off" | "none" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the lookup cache can hold
    pub cache_capacity: usize,
    /// Which cache backend to run
    pub cache_backend: CacheBackendKind,
    /// Redis connection string (redis backend only)
    pub redis_url: String,
    /// Path of the SQLite database file
    pub db_path: String,
    /// Per-operation deadline in milliseconds
    pub op_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached entries (default: 30)
    /// - `CACHE_BACKEND` - memory | redis | off (default: memory)
    /// - `REDIS_URL` - Redis connection string (default: redis://127.0.0.1:6379/0)
    /// - `DB_PATH` - SQLite database path (default: shortlink.db)
    /// - `OP_TIMEOUT_MS` - Per-operation deadline in ms (default: 5000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackendKind::parse(&v))
                .unwrap_or_default(),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "shortlink.db".to_string()),
            op_timeout_ms: env::var("OP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// The per-operation deadline as a Duration.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_backend: CacheBackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            db_path: "shortlink.db".to_string(),
            op_timeout_ms: 5000,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 30);
        assert_eq!(config.cache_backend, CacheBackendKind::Memory);
        assert_eq!(config.op_timeout_ms, 5000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.op_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(CacheBackendKind::parse("memory"), Some(CacheBackendKind::Memory));
        assert_eq!(CacheBackendKind::parse("REDIS"), Some(CacheBackendKind::Redis));
        assert_eq!(CacheBackendKind::parse("off"), Some(CacheBackendKind::Off));
        assert_eq!(CacheBackendKind::parse("none"), Some(CacheBackendKind::Off));
        assert_eq!(CacheBackendKind::parse("bogus"), None);
    }
}
