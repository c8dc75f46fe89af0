//! Storage module for persisting harvested records
//!
//! This module handles the two flat files the harvester owns:
//! - The primary store of film records, keyed by detail URL
//! - The failed store of detail pages that could not be resolved
//!
//! The primary store only ever grows by appending during a crawl; a repair
//! pass replaces it as a whole through an atomic rename.

mod csv_store;
mod schema;
mod traits;

pub use csv_store::CsvStore;
pub use schema::{FAILED_HEADER, MOVIES_HEADER};
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::config::OutputConfig;

/// Opens the CSV store described by the output configuration
///
/// Missing files are created with their header line.
pub fn open_store(config: &OutputConfig) -> StorageResult<CsvStore> {
    let store = CsvStore::new(&config.movies_path, &config.failed_path);
    store.init()?;
    Ok(store)
}

/// One harvested film
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub title: String,

    /// Detail page URL; unique across the primary store
    pub detail_url: String,

    pub download_link: Option<String>,
}

impl MovieRecord {
    pub fn new(
        title: impl Into<String>,
        detail_url: impl Into<String>,
        download_link: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            detail_url: detail_url.into(),
            download_link,
        }
    }

    /// True if the title is empty or the download link is missing
    pub fn is_incomplete(&self) -> bool {
        self.title.is_empty() || self.download_link.as_deref().map_or(true, str::is_empty)
    }

    /// Merges a fresh resolution of the same detail page into this record
    ///
    /// Non-empty fresh fields replace the stored ones; empty or missing fresh
    /// fields never erase what is stored. Returns true if anything changed.
    pub fn amend_from(&mut self, fresh: MovieRecord) -> bool {
        let mut changed = false;

        if !fresh.title.is_empty() && fresh.title != self.title {
            self.title = fresh.title;
            changed = true;
        }

        if let Some(link) = fresh.download_link.filter(|link| !link.is_empty()) {
            if self.download_link.as_deref() != Some(link.as_str()) {
                self.download_link = Some(link);
                changed = true;
            }
        }

        changed
    }
}

/// A detail page that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    /// Best known title, possibly empty
    pub title: String,

    pub detail_url: String,
}

impl FailedRecord {
    pub fn new(title: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail_url: detail_url.into(),
        }
    }
}
