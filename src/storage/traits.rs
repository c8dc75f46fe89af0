//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the
//! associated error types.

use crate::storage::{FailedRecord, MovieRecord};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
///
/// The primary store holds [`MovieRecord`]s keyed by detail URL; the failed
/// store holds [`FailedRecord`]s and is never compacted.
pub trait RecordStore {
    /// Creates missing store files with their header lines
    fn init(&self) -> StorageResult<()>;

    // ===== Primary Store =====

    /// Detail URLs already present in the primary store
    fn existing_urls(&self) -> StorageResult<HashSet<String>> {
        Ok(self
            .read_movies()?
            .into_iter()
            .map(|record| record.detail_url)
            .filter(|url| !url.is_empty())
            .collect())
    }

    /// Reads every record of the primary store, in file order
    fn read_movies(&self) -> StorageResult<Vec<MovieRecord>>;

    /// Appends records to the primary store
    fn append_movies(&self, records: &[MovieRecord]) -> StorageResult<()>;

    /// Appends a single record to the primary store
    fn append_movie(&self, record: &MovieRecord) -> StorageResult<()> {
        self.append_movies(std::slice::from_ref(record))
    }

    /// Replaces the whole primary store
    ///
    /// Implementations must never leave a truncated store behind, even if
    /// the process dies mid-write.
    fn rewrite_movies(&self, records: &[MovieRecord]) -> StorageResult<()>;

    // ===== Failed Store =====

    /// Reads every record of the failed store, in file order
    fn read_failed(&self) -> StorageResult<Vec<FailedRecord>>;

    /// Appends a record to the failed store
    fn append_failed(&self, record: &FailedRecord) -> StorageResult<()>;
}
