//! Polymarket trade ingestion.
//!
//! Pulls the public trades feed page by page, normalizes each record, and
//! stores batches in PostgreSQL with duplicate detection on the natural
//! key (transaction hash, proxy wallet, asset, timestamp). Re-running
//! over an already ingested range reports duplicates instead of inserting
//! twice, so a run can be repeated or resumed blindly.
//!
//! # Example
//!
//! ```no_run
//! use poly_ingest::{ensure_schema, Config, IngestPipeline, TradesClient, TradeWriter};
//! use sqlx::postgres::PgPoolOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = PgPoolOptions::new().connect(&config.database.url).await?;
//!     ensure_schema(&pool).await?;
//!
//!     let client = TradesClient::new(&config.api)?;
//!     let writer = TradeWriter::new(pool.clone());
//!     let totals = IngestPipeline::new(client, writer, &config.run).run().await;
//!     tracing::info!(
//!         "{} new, {} duplicates, {} errors",
//!         totals.new,
//!         totals.duplicates,
//!         totals.errors
//!     );
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod storage;

pub use client::{FetchError, TradesClient};
pub use config::{ApiConfig, Config, DatabaseConfig, RunConfig};
pub use error::{IngestError, Result};
pub use models::{BatchStats, InsertOutcome, RawTrade, RunTotals, Trade};
pub use normalize::normalize;
pub use pipeline::{IngestPipeline, PageFetcher, TradeSink};
pub use schema::ensure_schema;
pub use storage::TradeWriter;
