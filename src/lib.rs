//! Reel-Harvest: a polite film-listing harvester
//!
//! This crate crawls paginated film listings, extracts per-title metadata
//! (title, detail URL, download link) from detail pages, and keeps the results
//! in flat CSV files. A repair pass revisits failed and incomplete records.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Reel-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns true for failures scoped to a single record
    ///
    /// These are logged and written to the failed store; everything else
    /// aborts the run.
    pub fn is_record_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Extract(_) | Self::UrlParse(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
}

/// Result type alias for Reel-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{DetailExtractor, DetailFields};
pub use storage::{CsvStore, FailedRecord, MovieRecord, RecordStore};
pub use url::{page_url, ListingSource};
