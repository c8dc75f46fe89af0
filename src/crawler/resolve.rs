//! Detail page resolution
//!
//! The boundary where per-record failures are caught: a detail URL goes in,
//! and either a record or a record-scoped error comes out.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::extract::{DetailExtractor, DetailFields};
use crate::storage::MovieRecord;

/// Fetches detail pages and extracts their fields
#[derive(Debug, Clone)]
pub struct DetailResolver {
    fetcher: Fetcher,
    extractor: DetailExtractor,
}

impl DetailResolver {
    pub fn new(fetcher: Fetcher, extractor: DetailExtractor) -> Self {
        Self { fetcher, extractor }
    }

    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self::new(
            Fetcher::from_config(&config.fetch, &config.site)?,
            DetailExtractor::from_config(&config.site, &config.extraction),
        ))
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetches a detail page and builds its record
    ///
    /// # Returns
    ///
    /// * `Ok(MovieRecord)` - Title found; the download link may be absent
    /// * `Err(HarvestError::Fetch)` - The page could not be fetched or decoded
    /// * `Err(HarvestError::Extract)` - Block page, or no title
    pub async fn resolve(&self, detail_url: &str) -> crate::Result<MovieRecord> {
        let page = self.fetcher.fetch_page(detail_url).await?;
        let DetailFields {
            title,
            download_link,
            link_source,
        } = self.extractor.extract(&page.markup)?;

        if download_link.is_none() {
            tracing::warn!("No download link found for '{}' ({})", title, detail_url);
        } else {
            tracing::debug!("Resolved '{}' via {}", title, link_source);
        }

        Ok(MovieRecord::new(title, detail_url, download_link))
    }
}
