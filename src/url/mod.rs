//! URL handling module for Reel-Harvest
//!
//! This module builds listing page URLs for the site's three category URL
//! shapes and recognises detail page links.

mod detail;
mod paging;

// Re-export main functions
pub use detail::{is_detail_path, resolve_detail_link};
pub use paging::page_url;

use std::fmt;

/// URL shape of a listing source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Ends in a run of digits followed by `/`, e.g. `https://site/5/`
    Numbered,
    /// Ends in `index.html`, e.g. `https://site/html/tv/index.html`
    IndexPage,
    /// Any other category directory, e.g. `https://site/html/gndy/dyzz/`
    Directory,
}

impl SourceKind {
    /// Classifies a source URL by its shape
    pub fn of(source: &str) -> Self {
        if ends_with_numbered_segment(source) {
            Self::Numbered
        } else if source.ends_with("index.html") {
            Self::IndexPage
        } else {
            Self::Directory
        }
    }
}

/// True when the URL ends with one or more ASCII digits followed by `/`
fn ends_with_numbered_segment(source: &str) -> bool {
    source
        .strip_suffix('/')
        .and_then(|rest| rest.chars().last())
        .is_some_and(|c| c.is_ascii_digit())
}

/// One category of listings, identified by its URL template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingSource(String);

impl ListingSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> SourceKind {
        SourceKind::of(&self.0)
    }

    /// URL of the given listing page (1-based)
    ///
    /// # Examples
    ///
    /// ```
    /// use reel_harvest::ListingSource;
    ///
    /// let source = ListingSource::new("https://site/5/");
    /// assert_eq!(source.page_url(1), "https://site/5/");
    /// assert_eq!(source.page_url(3), "https://site/5/index_3.html");
    /// ```
    pub fn page_url(&self, page: u32) -> String {
        page_url(&self.0, page)
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingSource {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ListingSource {
    fn from(url: String) -> Self {
        Self(url)
    }
}
