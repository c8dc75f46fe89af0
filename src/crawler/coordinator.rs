//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Iterating listing sources in configured order
//! - Inferring each source's page count from its first page
//! - Resolving unseen detail links and appending them immediately
//! - Recording unresolvable detail pages in the failed store
//! - Politeness delays between details, pages and sources

use crate::config::{Config, DelayConfig};
use crate::crawler::pause;
use crate::crawler::resolve::DetailResolver;
use crate::extract::{extract_listing_items, max_page, ListingItem};
use crate::output::CrawlSummary;
use crate::storage::{FailedRecord, RecordStore};
use crate::url::ListingSource;
use std::collections::HashSet;
use url::Url;

/// Main crawl coordinator structure
pub struct Coordinator<S: RecordStore> {
    sources: Vec<ListingSource>,
    delays: DelayConfig,
    base_url: Url,
    resolver: DetailResolver,
    store: S,

    /// Detail URLs already in the primary store or attempted this run
    known: HashSet<String>,
}

impl<S: RecordStore> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `store` - The record store to append to
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid base URL, encoding, or HTTP client setup
    pub fn new(config: Config, store: S) -> crate::Result<Self> {
        let base_url = Url::parse(&config.site.base_url)?;
        let resolver = DetailResolver::from_config(&config)?;

        Ok(Self {
            sources: config.sources.into_iter().map(ListingSource::new).collect(),
            delays: config.delays,
            base_url,
            resolver,
            store,
            known: HashSet::new(),
        })
    }

    /// Runs the crawl loop
    ///
    /// Page 1 of every source is always fetched to learn the page count, but
    /// listing items are only processed on pages `>= start_page`. Per-record
    /// failures never stop the run; store errors do.
    pub async fn run(&mut self, start_page: u32) -> crate::Result<CrawlSummary> {
        let start_page = start_page.max(1);
        let mut summary = CrawlSummary::start();

        self.known = self.store.existing_urls()?;
        tracing::info!(
            "Starting crawl of {} sources from page {} ({} records already stored)",
            self.sources.len(),
            start_page,
            self.known.len()
        );

        let sources = self.sources.clone();
        for (index, source) in sources.iter().enumerate() {
            tracing::info!(
                "Source {}/{}: {}",
                index + 1,
                sources.len(),
                source
            );

            self.crawl_source(source, start_page, &mut summary).await?;

            if index + 1 < sources.len() {
                pause(self.delays.source_ms).await;
            }
        }

        summary.finish();
        summary.log();
        Ok(summary)
    }

    async fn crawl_source(
        &mut self,
        source: &ListingSource,
        start_page: u32,
        summary: &mut CrawlSummary,
    ) -> crate::Result<()> {
        let first_url = source.page_url(1);
        let first = match self.resolver.fetcher().fetch_page(&first_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Skipping source {}: {}", source, e);
                summary.sources_skipped += 1;
                return Ok(());
            }
        };

        summary.sources_visited += 1;
        summary.pages_fetched += 1;

        let last_page = max_page(&first.markup);
        tracing::info!("{} has {} pages", source, last_page);

        if start_page <= 1 {
            let items = extract_listing_items(&first.markup, &self.base_url);
            self.process_items(&items, summary).await?;
        }

        for page in start_page.max(2)..=last_page {
            pause(self.delays.page_ms).await;

            let page_url = source.page_url(page);
            tracing::info!("Listing page {}/{}: {}", page, last_page, page_url);

            match self.resolver.fetcher().fetch_page(&page_url).await {
                Ok(listing) => {
                    summary.pages_fetched += 1;
                    let items = extract_listing_items(&listing.markup, &self.base_url);
                    self.process_items(&items, summary).await?;
                }
                Err(e) => {
                    tracing::error!("Skipping listing page {}: {}", page_url, e);
                    summary.pages_failed += 1;
                }
            }
        }

        Ok(())
    }

    async fn process_items(
        &mut self,
        items: &[ListingItem],
        summary: &mut CrawlSummary,
    ) -> crate::Result<()> {
        tracing::debug!("{} detail links on page", items.len());

        for item in items {
            if !self.known.insert(item.url.clone()) {
                tracing::debug!("Already seen: {}", item.url);
                summary.records_skipped += 1;
                continue;
            }

            pause(self.delays.detail_ms).await;

            match self.resolver.resolve(&item.url).await {
                Ok(record) => {
                    self.store.append_movie(&record)?;
                    if record.download_link.is_none() {
                        summary.records_without_link += 1;
                    }
                    summary.records_added += 1;
                    tracing::info!("Stored '{}'", record.title);
                }
                Err(e) if e.is_record_failure() => {
                    tracing::error!("Failed to resolve {}: {}", item.url, e);
                    self.store
                        .append_failed(&FailedRecord::new(item.title.as_str(), item.url.as_str()))?;
                    summary.records_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
