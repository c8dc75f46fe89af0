//! Page extraction for Reel-Harvest
//!
//! This module turns decoded page markup into data:
//! - Detail pages: title and download link ([`DetailExtractor`])
//! - Raw-text link fallbacks used when the content area has no usable anchor
//! - Listing pages: total page count and detail links
//!
//! Everything here is a pure function of the markup, so it can be tested
//! without any network access.

mod detail;
mod links;
mod listing;
mod pagination;

pub use detail::{DetailExtractor, DetailFields, LinkSource};
pub use links::{find_ftp_link, find_http_link, find_magnet_link, find_text_link, is_static_asset};
pub use listing::{extract_listing_items, ListingItem};
pub use pagination::{max_page, parse_leading_int};

use thiserror::Error;

/// Errors raised while extracting fields from a detail page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Anti-scraping block page detected (matched \"{phrase}\")")]
    Blocked { phrase: String },

    #[error("Title element missing or empty")]
    MissingTitle,
}
