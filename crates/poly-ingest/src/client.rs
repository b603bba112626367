//! HTTP client for the paginated trades endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ApiConfig;
use crate::models::RawTrade;
use crate::pipeline::PageFetcher;

/// Ways a single fetch attempt can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect failure, timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("server returned an error status: {0}")]
    Status(#[source] reqwest::Error),

    /// The endpoint answered 2xx but the body was not a JSON array of
    /// trade records.
    #[error("response body could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    /// Whether another attempt is allowed. Transport and status failures
    /// always retry; decode failures only when `retry_on_decode` is set.
    fn retryable(&self, retry_on_decode: bool) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Status(_) => true,
            FetchError::Decode(_) => retry_on_decode,
        }
    }
}

/// Client for the trades endpoint with bounded, fixed-delay retries.
pub struct TradesClient {
    client: Client,
    base_url: String,
    retry_delay: Duration,
    max_retries: u32,
    retry_on_decode: bool,
}

impl TradesClient {
    /// Create a new client from the API configuration.
    pub fn new(config: &ApiConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent("poly-ingest/0.1")
            .build()?;

        Ok(TradesClient {
            client,
            base_url: config.base_url.clone(),
            retry_delay: config.retry_delay(),
            max_retries: config.max_retries,
            retry_on_decode: config.retry_on_decode,
        })
    }

    /// Fetch one page of records, retrying failed attempts with a fixed
    /// delay.
    ///
    /// Makes at most `max_retries + 1` attempts. Once the bound is
    /// exhausted, or the failure is one the retry policy does not cover,
    /// the last error is returned.
    pub async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<RawTrade>, FetchError> {
        let attempts = self.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_fetch(offset, limit).await {
                Ok(records) => return Ok(records),
                Err(e) => {
                    warn!(
                        "Request failed (attempt {}/{}) at offset {}: {}",
                        attempt, attempts, offset, e
                    );

                    if attempt >= attempts || !e.retryable(self.retry_on_decode) {
                        error!("Giving up at offset {} after {} attempt(s)", offset, attempt);
                        return Err(e);
                    }

                    info!("Retrying in {} seconds...", self.retry_delay.as_secs());
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// One attempt: GET the page and decode the body.
    async fn try_fetch(&self, offset: u64, limit: u64) -> Result<Vec<RawTrade>, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let response = response.error_for_status().map_err(FetchError::Status)?;

        response.json().await.map_err(FetchError::Decode)
    }
}

#[async_trait]
impl PageFetcher for TradesClient {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<RawTrade>, FetchError> {
        TradesClient::fetch_page(self, offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ApiConfig::default();
        let client = TradesClient::new(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_decode_not_retryable_by_default() {
        // The only variant with a policy choice; transport and status are
        // always retryable.
        let config = ApiConfig::default();
        let client = TradesClient::new(&config).unwrap();
        assert!(!client.retry_on_decode);
    }

    #[tokio::test]
    #[ignore] // Ignore by default (requires network)
    async fn test_fetch_live_page() {
        let config = ApiConfig::default();
        let client = TradesClient::new(&config).unwrap();

        let result = client.fetch_page(0, 5).await;
        assert!(result.is_ok());
        assert!(result.unwrap().len() <= 5);
    }
}
