//! Wire and storage models for trade records, plus the run accounting types.

use serde::Deserialize;

/// One trade as the API returns it.
///
/// Field names on the wire are camelCase. The five profile fields may be
/// null or missing; every other field must be present for the record to
/// decode, and a page containing such a record fails as a whole.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    pub proxy_wallet: String,
    pub side: String,
    pub asset: String,
    pub condition_id: String,
    pub size: f64,
    pub price: f64,
    pub timestamp: i64,
    pub title: String,
    pub slug: String,
    pub icon: String,
    pub event_slug: String,
    pub outcome: String,
    pub outcome_index: i32,
    pub name: Option<String>,
    pub pseudonym: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub profile_image_optimized: Option<String>,
    pub transaction_hash: String,
}

/// A trade ready for storage: the same shape as [`RawTrade`] with the
/// nullable profile fields flattened to plain strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub proxy_wallet: String,
    pub side: String,
    pub asset: String,
    pub condition_id: String,
    pub size: f64,
    pub price: f64,
    pub timestamp: i64,
    pub title: String,
    pub slug: String,
    pub icon: String,
    pub event_slug: String,
    pub outcome: String,
    pub outcome_index: i32,
    pub name: String,
    pub pseudonym: String,
    pub bio: String,
    pub profile_image: String,
    pub profile_image_optimized: String,
    pub transaction_hash: String,
}

/// How one row insert ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was inserted.
    New,
    /// A row with the same natural key already exists; nothing was written.
    Duplicate,
    /// The insert failed for some other reason.
    Error(String),
}

/// Per-batch insert accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub new: u64,
    pub duplicates: u64,
    pub errors: u64,
}

impl BatchStats {
    /// Reduce a batch of insert outcomes to counts.
    pub fn tally(outcomes: &[InsertOutcome]) -> Self {
        let mut stats = BatchStats::default();
        for outcome in outcomes {
            match outcome {
                InsertOutcome::New => stats.new += 1,
                InsertOutcome::Duplicate => stats.duplicates += 1,
                InsertOutcome::Error(_) => stats.errors += 1,
            }
        }
        stats
    }

    /// Stats for a batch where no insert could even be attempted.
    pub fn all_errors(count: u64) -> Self {
        BatchStats {
            new: 0,
            duplicates: 0,
            errors: count,
        }
    }
}

/// Running totals for a whole ingestion run.
///
/// One instance is threaded through the page loop and owns all the
/// counting; per-batch [`BatchStats`] are folded in as pages complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub new: u64,
    pub duplicates: u64,
    pub errors: u64,
}

impl RunTotals {
    /// Fold one batch into the totals.
    pub fn absorb(&mut self, stats: BatchStats) {
        self.new += stats.new;
        self.duplicates += stats.duplicates;
        self.errors += stats.errors;
    }

    /// Count a page whose fetch failed after all retries. One error per
    /// page, however many records the page would have held.
    pub fn record_page_failure(&mut self) {
        self.errors += 1;
    }

    /// Records that reached the store, new and duplicate alike.
    pub fn processed(&self) -> u64 {
        self.new + self.duplicates
    }
}
