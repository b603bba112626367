//! Error types for the ingestion pipeline.

use thiserror::Error;

use crate::client::FetchError;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error type for ingestion operations
#[derive(Error, Debug)]
pub enum IngestError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// Database operation failed
    #[error("Database error: {0}. Check DATABASE_URL and that PostgreSQL is reachable.")]
    Database(#[from] sqlx::Error),

    /// HTTP client could not be built or used
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A page fetch failed after all retries
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IngestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
