//! Statistics generation from the record store
//!
//! This module provides functionality for extracting and displaying
//! statistics about the harvested records.

use crate::storage::{RecordStore, StorageResult};
use std::collections::HashSet;

/// Store statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Records in the primary store
    pub total_records: u64,

    /// Records with an empty title
    pub missing_titles: u64,

    /// Records without a download link
    pub missing_links: u64,

    /// Records missing a title, a download link, or both
    pub incomplete_records: u64,

    /// Entries in the failed store, duplicates included
    pub failed_entries: u64,

    /// Distinct failed URLs that are not in the primary store yet
    pub pending_failed: u64,
}

impl StoreStatistics {
    /// Records with both a title and a download link
    pub fn complete_records(&self) -> u64 {
        self.total_records.saturating_sub(self.incomplete_records)
    }
}

/// Loads statistics from a record store
///
/// # Arguments
///
/// * `store` - The record store to inspect
pub fn load_statistics(store: &dyn RecordStore) -> StorageResult<StoreStatistics> {
    let movies = store.read_movies()?;
    let failed = store.read_failed()?;

    let known: HashSet<&str> = movies.iter().map(|m| m.detail_url.as_str()).collect();
    let pending: HashSet<&str> = failed
        .iter()
        .map(|f| f.detail_url.as_str())
        .filter(|url| !url.is_empty() && !known.contains(url))
        .collect();

    Ok(StoreStatistics {
        total_records: movies.len() as u64,
        missing_titles: movies.iter().filter(|m| m.title.is_empty()).count() as u64,
        missing_links: movies
            .iter()
            .filter(|m| m.download_link.is_none())
            .count() as u64,
        incomplete_records: movies.iter().filter(|m| m.is_incomplete()).count() as u64,
        failed_entries: failed.len() as u64,
        pending_failed: pending.len() as u64,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Records:");
    println!("  Total: {}", stats.total_records);
    println!("  Missing title: {}", stats.missing_titles);
    println!("  Missing download link: {}", stats.missing_links);
    println!("  Incomplete: {}", stats.incomplete_records);
    println!();

    println!("Failed store:");
    println!("  Entries: {}", stats.failed_entries);
    println!("  Pending (not yet recovered): {}", stats.pending_failed);
    println!();

    let rate = if stats.total_records > 0 {
        stats.complete_records() as f64 / stats.total_records as f64 * 100.0
    } else {
        0.0
    };

    println!(
        "Completeness: {:.1}% ({} / {} records have a title and link)",
        rate,
        stats.complete_records(),
        stats.total_records
    );
}
