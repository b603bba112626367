//! Database schema bootstrap.
//!
//! Create-if-absent only: nothing here alters or migrates an existing
//! table.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

const CREATE_TRADES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS trades_data (
    id BIGSERIAL PRIMARY KEY,
    proxy_wallet TEXT,
    side TEXT,
    asset TEXT,
    condition_id TEXT,
    size DOUBLE PRECISION,
    price DOUBLE PRECISION,
    timestamp BIGINT,
    title TEXT,
    slug TEXT,
    icon TEXT,
    event_slug TEXT,
    outcome TEXT,
    outcome_index INTEGER,
    name TEXT,
    pseudonym TEXT,
    bio TEXT,
    profile_image TEXT,
    profile_image_optimized TEXT,
    transaction_hash TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// The unique index that defines record identity. An insert that collides
/// here is a duplicate, not an error.
const CREATE_UNIQUE_TRADE_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS unique_trade_record
ON trades_data (transaction_hash, proxy_wallet, asset, timestamp)
"#;

/// Secondary indexes matching the downstream query patterns.
const SECONDARY_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_trades_timestamp ON trades_data (timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_trades_asset_timestamp_size_price ON trades_data (asset, timestamp, size, price)",
    "CREATE INDEX IF NOT EXISTS idx_trades_asset ON trades_data (asset)",
    "CREATE INDEX IF NOT EXISTS idx_trades_asset_timestamp ON trades_data (asset, timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_trades_size ON trades_data (size)",
    "CREATE INDEX IF NOT EXISTS idx_trades_side ON trades_data (side)",
    "CREATE INDEX IF NOT EXISTS idx_trades_price ON trades_data (price)",
    "CREATE INDEX IF NOT EXISTS idx_trades_condition_id ON trades_data (condition_id)",
];

/// Create the trades table and its indexes if they do not already exist.
///
/// Runs in one transaction. A failure here means the store is unusable,
/// so it propagates and the run never starts.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(CREATE_TRADES_TABLE).execute(&mut *tx).await?;
    sqlx::query(CREATE_UNIQUE_TRADE_INDEX)
        .execute(&mut *tx)
        .await?;
    for ddl in SECONDARY_INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!("Database schema ready");
    Ok(())
}
