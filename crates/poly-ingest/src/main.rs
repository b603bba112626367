//! Polymarket trade ingestion binary.

use anyhow::Result;
use clap::Parser;
use poly_common::logging::{init_logging, LogConfig, LogLevel};
use poly_ingest::{ensure_schema, Config, IngestPipeline, TradesClient, TradeWriter};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "poly-ingest")]
#[command(author, version, about = "Polymarket trade ingestion tool")]
struct Cli {
    /// Number of pages to walk (overrides INGEST_TOTAL_PAGES)
    #[arg(long)]
    total_pages: Option<u64>,

    /// Records per page (overrides INGEST_PAGE_SIZE)
    #[arg(long)]
    page_size: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flags beat environment, environment beats defaults.
    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    info!("Starting Polymarket trade ingestion");

    let mut config = Config::load()?;
    if let Some(total_pages) = cli.total_pages {
        config.run.total_pages = total_pages;
    }
    if let Some(page_size) = cli.page_size {
        config.run.page_size = page_size;
    }
    config.validate()?;

    info!(
        "Configured for {} pages of {} records from {}",
        config.run.total_pages, config.run.page_size, config.api.base_url
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.connect_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;
    info!("Database connection pool established");

    ensure_schema(&pool).await?;

    let client = TradesClient::new(&config.api)?;
    let writer = TradeWriter::new(pool.clone());
    let pipeline = IngestPipeline::new(client, writer, &config.run);

    let totals = pipeline.run().await;

    pool.close().await;

    info!(
        "Run finished: {} new, {} duplicates, {} errors",
        totals.new, totals.duplicates, totals.errors
    );

    Ok(())
}
