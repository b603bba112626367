//! Idempotent persistence of trade batches.
//!
//! One transaction per batch, one savepoint per row. A row that collides
//! with the identity index counts as a duplicate; any other rejected row
//! rolls back alone while its siblings go on to commit.

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use tracing::{debug, error, warn};

use crate::models::{BatchStats, InsertOutcome, Trade};
use crate::pipeline::TradeSink;

/// Name of the unique index that defines record identity.
pub const UNIQUE_TRADE_INDEX: &str = "unique_trade_record";

const INSERT_TRADE: &str = r#"
INSERT INTO trades_data (
    proxy_wallet, side, asset, condition_id, size, price, timestamp,
    title, slug, icon, event_slug, outcome, outcome_index,
    name, pseudonym, bio, profile_image, profile_image_optimized,
    transaction_hash
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
"#;

/// Batch writer backed by a PostgreSQL pool. Append-only: nothing here
/// updates or deletes.
pub struct TradeWriter {
    pool: PgPool,
}

impl TradeWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TradeSink for TradeWriter {
    async fn write_batch(&self, trades: &[Trade]) -> BatchStats {
        if trades.is_empty() {
            return BatchStats::default();
        }

        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                error!("Failed to open batch transaction: {}", e);
                return BatchStats::all_errors(trades.len() as u64);
            }
        };

        let mut outcomes = Vec::with_capacity(trades.len());
        for trade in trades {
            outcomes.push(insert_row(&mut tx, trade).await);
        }

        let stats = BatchStats::tally(&outcomes);

        // Commit failure is logged, not raised; the counts were already
        // settled per row.
        if let Err(e) = tx.commit().await {
            error!("Failed to commit batch of {} rows: {}", trades.len(), e);
        }

        stats
    }
}

/// Insert one row inside its own savepoint so a rejection rolls back alone
/// and the batch transaction stays usable.
async fn insert_row(tx: &mut Transaction<'_, Postgres>, trade: &Trade) -> InsertOutcome {
    let mut sp = match tx.begin().await {
        Ok(sp) => sp,
        Err(e) => {
            error!("Failed to open savepoint: {}", e);
            return InsertOutcome::Error(e.to_string());
        }
    };

    let result = sqlx::query(INSERT_TRADE)
        .bind(&trade.proxy_wallet)
        .bind(&trade.side)
        .bind(&trade.asset)
        .bind(&trade.condition_id)
        .bind(trade.size)
        .bind(trade.price)
        .bind(trade.timestamp)
        .bind(&trade.title)
        .bind(&trade.slug)
        .bind(&trade.icon)
        .bind(&trade.event_slug)
        .bind(&trade.outcome)
        .bind(trade.outcome_index)
        .bind(&trade.name)
        .bind(&trade.pseudonym)
        .bind(&trade.bio)
        .bind(&trade.profile_image)
        .bind(&trade.profile_image_optimized)
        .bind(&trade.transaction_hash)
        .execute(&mut *sp)
        .await;

    match result {
        Ok(_) => match sp.commit().await {
            Ok(()) => InsertOutcome::New,
            Err(e) => {
                error!("Failed to release savepoint: {}", e);
                InsertOutcome::Error(e.to_string())
            }
        },
        Err(e) => {
            let outcome = classify_insert_error(&e, &trade.transaction_hash);
            if let Err(rollback_err) = sp.rollback().await {
                error!("Savepoint rollback failed: {}", rollback_err);
            }
            outcome
        }
    }
}

fn classify_insert_error(e: &sqlx::Error, transaction_hash: &str) -> InsertOutcome {
    match e {
        sqlx::Error::Database(db_err) => classify_db_error(db_err.as_ref(), transaction_hash),
        other => {
            error!("Insert failed for {}: {}", transaction_hash, other);
            InsertOutcome::Error(other.to_string())
        }
    }
}

/// Sort a rejected insert into duplicate or error. Only a collision on the
/// identity index counts as a duplicate; every other rejection, including
/// unique violations elsewhere, is an error.
fn classify_db_error(db_err: &dyn DatabaseError, transaction_hash: &str) -> InsertOutcome {
    if matches!(db_err.kind(), ErrorKind::UniqueViolation)
        && db_err.constraint() == Some(UNIQUE_TRADE_INDEX)
    {
        debug!("Duplicate record skipped: {}", transaction_hash);
        return InsertOutcome::Duplicate;
    }

    warn!("Insert rejected for {}: {}", transaction_hash, db_err);
    InsertOutcome::Error(db_err.to_string())
}
