// src/models/run.rs

//! Run-level state threaded through a crawl.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{DebtorRecord, Variant};

/// One parsed result page.
#[derive(Debug, Clone)]
pub struct PageBatch {
    /// Page number (1-based)
    pub page: u64,
    pub records: Vec<DebtorRecord>,
}

/// Running totals for a single crawl, passed explicitly between steps.
#[derive(Debug, Default)]
pub struct RunState {
    /// Record count reported by the sizing request
    pub total_rows: u64,
    /// Page estimate, corrected downward when the sentinel page is hit
    pub total_pages: u64,
    /// Pages actually fetched and parsed
    pub pages_fetched: u64,
    /// Rows parsed across all pages
    pub rows_seen: u64,
    /// Rows handed to the upsert sink
    pub upserted: u64,
    /// Rows removed by the reaper
    pub deleted: u64,
    seen_hashes: HashSet<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one upserted page batch.
    pub fn record_batch(&mut self, batch: &PageBatch) {
        self.pages_fetched += 1;
        self.rows_seen += batch.records.len() as u64;
        self.upserted += batch.records.len() as u64;
        for record in &batch.records {
            self.seen_hashes.insert(record.hash_value.clone());
        }
    }

    /// Distinct identity hashes observed during the run.
    pub fn unique_rows(&self) -> usize {
        self.seen_hashes.len()
    }

    /// Single-line state summary for progress logging.
    pub fn state_line(&self) -> String {
        format!(
            "total_rows={} total_pages={} pages_fetched={} upserted={} deleted={} unique_rows={}",
            self.total_rows,
            self.total_pages,
            self.pages_fetched,
            self.upserted,
            self.deleted,
            self.unique_rows()
        )
    }
}

/// Proof that a variant's full page range was crawled without aborting.
///
/// Only the crawl pipeline can construct one, and it does so only after the
/// last page succeeded. The reaper takes this value instead of a bare
/// cutoff so a partial run can never delete live rows.
#[derive(Debug, Clone, Copy)]
pub struct CompletedCrawl {
    variant: Variant,
    started_at: DateTime<Utc>,
}

impl CompletedCrawl {
    pub(crate) fn new(variant: Variant, started_at: DateTime<Utc>) -> Self {
        Self {
            variant,
            started_at,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Reap cutoff: rows last updated strictly before this are stale.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
