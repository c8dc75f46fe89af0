//! Run summaries
//!
//! Counters collected while a crawl or repair pass runs, logged at the end.

use chrono::{DateTime, Utc};
use std::fmt;

/// Outcome of a crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Listing sources whose first page was fetched
    pub sources_visited: u64,

    /// Listing sources skipped because their first page failed
    pub sources_skipped: u64,

    /// Listing pages fetched successfully
    pub pages_fetched: u64,

    /// Listing pages that could not be fetched
    pub pages_failed: u64,

    /// Records appended to the primary store
    pub records_added: u64,

    /// Detail links skipped because they were stored or already attempted this run
    pub records_skipped: u64,

    /// Detail pages written to the failed store
    pub records_failed: u64,

    /// Added records that have no download link
    pub records_without_link: u64,
}

impl CrawlSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            sources_visited: 0,
            sources_skipped: 0,
            pages_fetched: 0,
            pages_failed: 0,
            records_added: 0,
            records_skipped: 0,
            records_failed: 0,
            records_without_link: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Whole seconds between start and finish, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn log(&self) {
        tracing::info!("{}", self);
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crawl finished: {} records added ({} without link), {} failed, {} already known; \
             {} pages fetched, {} pages failed; {} sources visited, {} skipped",
            self.records_added,
            self.records_without_link,
            self.records_failed,
            self.records_skipped,
            self.pages_fetched,
            self.pages_failed,
            self.sources_visited,
            self.sources_skipped,
        )?;

        if let Some(secs) = self.duration_seconds() {
            write!(f, " in {}s", secs)?;
        }

        Ok(())
    }
}

/// Outcome of a repair pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Failed entries not yet in the primary store
    pub failed_pending: u64,

    /// Failed entries resolved and appended
    pub failed_recovered: u64,

    /// Primary records with an empty title or missing link
    pub incomplete_found: u64,

    /// Incomplete records replaced by a fresh resolution
    pub incomplete_fixed: u64,

    /// Whether the primary store was rewritten
    pub rewritten: bool,
}

impl RepairSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            failed_pending: 0,
            failed_recovered: 0,
            incomplete_found: 0,
            incomplete_fixed: 0,
            rewritten: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn log(&self) {
        tracing::info!("{}", self);
    }
}

impl fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repair finished: {}/{} failed entries recovered, {}/{} incomplete records fixed",
            self.failed_recovered, self.failed_pending, self.incomplete_fixed, self.incomplete_found,
        )?;

        if !self.rewritten {
            write!(f, " (store unchanged)")?;
        }

        Ok(())
    }
}
