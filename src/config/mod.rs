//! Configuration module for Reel-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults targeting the dy2018 film-listing site, so an
//! empty file (or no file at all) is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use reel_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling {} sources", config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DelayConfig, ExtractionConfig, FetchConfig, OutputConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
