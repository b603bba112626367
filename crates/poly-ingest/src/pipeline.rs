//! The page-by-page ingestion driver.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::client::FetchError;
use crate::config::RunConfig;
use crate::models::{BatchStats, RawTrade, RunTotals, Trade};
use crate::normalize::normalize;

/// Source of raw trade pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page starting at `offset`, at most `limit` records.
    /// Implementations own their retry policy; an error here is final for
    /// the page.
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<RawTrade>, FetchError>;
}

/// Destination for normalized trade batches.
#[async_trait]
pub trait TradeSink: Send + Sync {
    /// Write one batch and report how each row fared.
    ///
    /// Infallible by contract: store faults are classified per row and
    /// come back as `errors` in the stats. The counts reflect insert
    /// classification; whether the surrounding commit reached disk is the
    /// implementation's concern and is only logged.
    async fn write_batch(&self, trades: &[Trade]) -> BatchStats;
}

/// Sequential driver walking a fixed page range.
///
/// One page at a time: fetch, normalize, write, pace, repeat. Failures
/// stay inside the page that caused them.
pub struct IngestPipeline<F, W> {
    fetcher: F,
    writer: W,
    page_size: u64,
    total_pages: u64,
    request_delay: Duration,
}

impl<F: PageFetcher, W: TradeSink> IngestPipeline<F, W> {
    pub fn new(fetcher: F, writer: W, run: &RunConfig) -> Self {
        Self {
            fetcher,
            writer,
            page_size: run.page_size,
            total_pages: run.total_pages,
            request_delay: run.request_delay(),
        }
    }

    /// Walk the configured page range once and return the totals.
    ///
    /// A page whose fetch fails after all retries adds exactly one error
    /// and the walk moves on. An empty page writes nothing and skips the
    /// pacing delay. Nothing in here ends the run early.
    pub async fn run(&self) -> RunTotals {
        let mut totals = RunTotals::default();

        info!(
            "Starting ingestion: {} pages of {} records each",
            self.total_pages, self.page_size
        );

        for page in 0..self.total_pages {
            let offset = page * self.page_size;
            info!(
                "Processing page {}/{} (offset: {})",
                page + 1,
                self.total_pages,
                offset
            );

            let raw = match self.fetcher.fetch_page(offset, self.page_size).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!("Error processing page {}: {}", page + 1, e);
                    totals.record_page_failure();
                    continue;
                }
            };

            if raw.is_empty() {
                warn!("No records returned at offset {}", offset);
                continue;
            }

            let trades: Vec<Trade> = raw.into_iter().map(normalize).collect();
            let stats = self.writer.write_batch(&trades).await;
            totals.absorb(stats);

            info!(
                "Page {} complete: {} new records, {} duplicates, {} errors",
                page + 1,
                stats.new,
                stats.duplicates,
                stats.errors
            );
            info!(
                "Running totals - New: {}, Duplicates: {}, Errors: {}",
                totals.new, totals.duplicates, totals.errors
            );

            if page + 1 < self.total_pages {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        info!("Ingestion complete");
        info!("Total records processed: {}", totals.processed());
        info!("Total new records: {}", totals.new);
        info!("Total duplicates skipped: {}", totals.duplicates);
        info!("Total errors: {}", totals.errors);

        totals
    }
}
