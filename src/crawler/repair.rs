//! Repair pass over failed and incomplete records
//!
//! Two passes run in order:
//! - Replay: failed-store entries not yet in the primary store are resolved
//!   again and appended on success
//! - Amend: primary records with an empty title or no download link are
//!   resolved again and the fresh fields merged in place; the store is
//!   rewritten once at the end, and only if something changed
//!
//! A failed re-resolution never touches the existing record.

use crate::config::Config;
use crate::crawler::pause;
use crate::crawler::resolve::DetailResolver;
use crate::output::RepairSummary;
use crate::storage::{MovieRecord, RecordStore};
use std::collections::HashSet;

/// Revisits failed and incomplete records
pub struct Repairer<S: RecordStore> {
    resolver: DetailResolver,
    store: S,
    delay_ms: u64,
}

impl<S: RecordStore> Repairer<S> {
    pub fn new(config: Config, store: S) -> crate::Result<Self> {
        Ok(Self {
            resolver: DetailResolver::from_config(&config)?,
            store,
            delay_ms: config.delays.repair_ms,
        })
    }

    /// Runs both passes and returns what they did
    pub async fn run(&self) -> crate::Result<RepairSummary> {
        let mut summary = RepairSummary::start();
        let mut resolutions = 0u64;

        self.replay_failed(&mut summary, &mut resolutions).await?;
        self.amend_incomplete(&mut summary, &mut resolutions).await?;

        summary.finish();
        summary.log();
        Ok(summary)
    }

    async fn replay_failed(
        &self,
        summary: &mut RepairSummary,
        resolutions: &mut u64,
    ) -> crate::Result<()> {
        let mut known = self.store.existing_urls()?;
        let mut replayed = HashSet::new();

        let pending: Vec<String> = self
            .store
            .read_failed()?
            .into_iter()
            .map(|failed| failed.detail_url)
            .filter(|url| !url.is_empty() && !known.contains(url))
            .filter(|url| replayed.insert(url.clone()))
            .collect();

        summary.failed_pending = pending.len() as u64;
        tracing::info!("Replaying {} failed entries", pending.len());

        for url in pending {
            if let Some(record) = self.re_resolve(&url, resolutions).await? {
                self.store.append_movie(&record)?;
                tracing::info!("Recovered '{}'", record.title);
                known.insert(record.detail_url);
                summary.failed_recovered += 1;
            }
        }

        Ok(())
    }

    async fn amend_incomplete(
        &self,
        summary: &mut RepairSummary,
        resolutions: &mut u64,
    ) -> crate::Result<()> {
        let mut records = self.store.read_movies()?;
        let mut changed = false;

        let incomplete = records.iter().filter(|r| r.is_incomplete()).count();
        summary.incomplete_found = incomplete as u64;
        tracing::info!("Amending {} incomplete records", incomplete);

        for record in records.iter_mut().filter(|r| r.is_incomplete()) {
            if record.detail_url.is_empty() {
                tracing::warn!("Cannot amend '{}': no detail URL", record.title);
                continue;
            }

            if let Some(fresh) = self.re_resolve(&record.detail_url, resolutions).await? {
                if record.amend_from(fresh) {
                    tracing::info!("Amended '{}'", record.title);
                    changed = true;
                    summary.incomplete_fixed += 1;
                }
            }
        }

        if changed {
            self.store.rewrite_movies(&records)?;
            summary.rewritten = true;
        }

        Ok(())
    }

    /// Resolves one URL, returning `None` on a record-scoped failure
    async fn re_resolve(
        &self,
        url: &str,
        resolutions: &mut u64,
    ) -> crate::Result<Option<MovieRecord>> {
        if *resolutions > 0 {
            pause(self.delay_ms).await;
        }
        *resolutions += 1;

        match self.resolver.resolve(url).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_record_failure() => {
                tracing::warn!("Still unresolved {}: {}", url, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
