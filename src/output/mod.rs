//! Output module for run summaries and store reports
//!
//! This module handles:
//! - Summaries of crawl and repair runs, logged when a run ends
//! - Statistics about the record store (CLI `--stats`)

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{CrawlSummary, RepairSummary};
