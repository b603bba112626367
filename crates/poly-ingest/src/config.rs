//! Configuration for an ingestion run.
//!
//! Everything comes from environment variables (a `.env` file is honored)
//! with the defaults below. `DATABASE_URL` is the one variable with no
//! default; a run cannot start without it.

use std::time::Duration;

use crate::error::{IngestError, Result};

// ============================================================================
// Ingestion Configuration Constants
// ============================================================================

/// Default trades endpoint.
pub const DEFAULT_API_URL: &str = "https://data-api.polymarket.com/trades";

/// Default per-request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Default number of pages walked in one run.
pub const DEFAULT_TOTAL_PAGES: u64 = 4000;

/// Default pacing delay between page fetches in seconds.
pub const DEFAULT_REQUEST_DELAY_SECS: u64 = 5;

/// Default delay before a fetch retry in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 20;

/// Default number of retries after a failed fetch attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 1;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Ingestion configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub run: RunConfig,
    pub database: DatabaseConfig,
}

/// Trades endpoint and retry policy
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_delay_secs: u64,
    pub max_retries: u32,
    /// Whether a page whose body fails to decode is retried like a
    /// transport failure. Off by default.
    pub retry_on_decode: bool,
}

/// Shape of the page walk
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub page_size: u64,
    pub total_pages: u64,
    pub request_delay_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            api: ApiConfig {
                base_url: std::env::var("TRADES_API_URL")
                    .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                timeout_secs: std::env::var("INGEST_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
                retry_delay_secs: std::env::var("INGEST_RETRY_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_DELAY_SECS),
                max_retries: std::env::var("INGEST_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_RETRIES),
                retry_on_decode: std::env::var("INGEST_RETRY_ON_DECODE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
            run: RunConfig {
                page_size: std::env::var("INGEST_PAGE_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_PAGE_SIZE),
                total_pages: std::env::var("INGEST_TOTAL_PAGES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOTAL_PAGES),
                request_delay_secs: std::env::var("INGEST_REQUEST_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_DELAY_SECS),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| IngestError::config("DATABASE_URL is not set"))?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
                connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
                idle_timeout_secs: std::env::var("DATABASE_IDLE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(IngestError::config("TRADES_API_URL cannot be empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(IngestError::config(
                "INGEST_HTTP_TIMEOUT_SECS must be greater than 0",
            ));
        }
        if self.run.page_size == 0 {
            return Err(IngestError::config(
                "INGEST_PAGE_SIZE must be greater than 0",
            ));
        }
        if self.database.url.is_empty() {
            return Err(IngestError::config("DATABASE_URL cannot be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(IngestError::config(
                "DATABASE_MAX_CONNECTIONS must be greater than 0",
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(IngestError::config(format!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        Ok(())
    }
}

impl ApiConfig {
    /// Per-request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before a retry as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl RunConfig {
    /// Pacing delay between pages as Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }
}

impl DatabaseConfig {
    /// Connection acquire timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Idle connection timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_on_decode: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: DEFAULT_TOTAL_PAGES,
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/polymarket".to_string(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://data-api.polymarket.com/trades");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retry_delay_secs, 20);
        assert_eq!(config.max_retries, 3);
        assert!(!config.retry_on_decode);
    }

    #[test]
    fn test_run_config_default() {
        let config = RunConfig::default();
        assert_eq!(config.page_size, 500);
        assert_eq!(config.total_pages, 4000);
        assert_eq!(config.request_delay_secs, 5);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_page_size() {
        let mut config = Config::default();
        config.run.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_api_url() {
        let mut config = Config::default();
        config.api.base_url = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_database_url() {
        let mut config = Config::default();
        config.database.url = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_pool_bounds() {
        let mut config = Config::default();
        config.database.min_connections = 10;
        config.database.max_connections = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_accessors() {
        let api = ApiConfig {
            timeout_secs: 45,
            retry_delay_secs: 7,
            ..Default::default()
        };
        assert_eq!(api.timeout(), Duration::from_secs(45));
        assert_eq!(api.retry_delay(), Duration::from_secs(7));

        let run = RunConfig {
            request_delay_secs: 2,
            ..Default::default()
        };
        assert_eq!(run.request_delay(), Duration::from_secs(2));

        let database = DatabaseConfig {
            connect_timeout_secs: 3,
            idle_timeout_secs: 120,
            ..Default::default()
        };
        assert_eq!(database.connect_timeout(), Duration::from_secs(3));
        assert_eq!(database.idle_timeout(), Duration::from_secs(120));
    }
}
