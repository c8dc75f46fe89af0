//! Crawler module for page fetching and run orchestration
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry, backoff and legacy-encoding decoding
//! - Detail page resolution into records
//! - The crawl loop over listing sources and pages
//! - The repair pass over failed and incomplete records

mod backoff;
mod coordinator;
mod decode;
mod fetcher;
mod repair;
mod resolve;

pub use backoff::RetryPolicy;
pub use coordinator::Coordinator;
pub use decode::{decode_body, encoding_for};
pub use fetcher::{build_http_client, FetchError, Fetcher, Page};
pub use repair::Repairer;
pub use resolve::DetailResolver;

use crate::config::Config;
use crate::output::{CrawlSummary, RepairSummary};
use crate::storage::RecordStore;
use std::time::Duration;

/// Runs a complete crawl
///
/// This is the main entry point for harvesting. It will:
/// 1. Seed the known-URL set from the primary store
/// 2. Walk every listing source and its pages
/// 3. Resolve unseen detail pages and append them as they arrive
/// 4. Record unresolvable detail pages in the failed store
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `store` - The record store to append to
/// * `start_page` - First listing page whose items are processed
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(HarvestError)` - A store or setup error stopped the run
pub async fn crawl<S: RecordStore>(
    config: Config,
    store: S,
    start_page: u32,
) -> crate::Result<CrawlSummary> {
    let mut coordinator = Coordinator::new(config, store)?;
    coordinator.run(start_page).await
}

/// Runs a repair pass over an existing store
pub async fn repair<S: RecordStore>(config: Config, store: S) -> crate::Result<RepairSummary> {
    let repairer = Repairer::new(config, store)?;
    repairer.run().await
}

/// Sleeps for a politeness delay; zero returns immediately
pub(crate) async fn pause(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
