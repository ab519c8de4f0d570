//! Drives providers through the entry builder.

use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::{Provider, ProviderError, ScrapeSummary};
use crate::entry::{EntryBuilder, IngestOutcome};

/// Runs scrape passes with a global limit on in-flight torrents.
///
/// The limiter is shared by every provider of the runner, so running
/// several providers at once never exceeds `max_concurrent` pipelines.
pub struct ScrapeRunner {
    builder: Arc<EntryBuilder>,
    limiter: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ScrapeRunner {
    pub fn new(builder: Arc<EntryBuilder>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            builder,
            limiter: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// One pass over every provider, concurrently.
    pub async fn run(&self, providers: &[Arc<dyn Provider>]) -> ScrapeSummary {
        let passes = providers.iter().map(|provider| async move {
            match self.run_provider(provider.as_ref()).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider pass failed");
                    ScrapeSummary::default()
                }
            }
        });

        let mut total = ScrapeSummary::default();
        for summary in futures::future::join_all(passes).await {
            total.merge(&summary);
        }
        total
    }

    /// One pass over a single provider. A failing torrent is logged and
    /// counted; it never stops the others.
    pub async fn run_provider(&self, provider: &dyn Provider) -> Result<ScrapeSummary, ProviderError> {
        let candidates = provider.discover().await?;
        let summary = Mutex::new(ScrapeSummary {
            discovered: candidates.len(),
            ..Default::default()
        });

        stream::iter(candidates)
            .for_each_concurrent(self.max_concurrent, |candidate| {
                let summary = &summary;
                async move {
                    let Ok(_permit) = self.limiter.acquire().await else {
                        return;
                    };

                    let record = match provider.resolve(&candidate).await {
                        Ok(record) => record,
                        Err(e) => {
                            warn!(
                                provider = provider.name(),
                                title = %candidate.title,
                                error = %e,
                                "Candidate not resolved"
                            );
                            summary.lock().unwrap().errors += 1;
                            return;
                        }
                    };

                    let outcome = self.builder.process(&record).await;
                    let mut summary = summary.lock().unwrap();
                    match outcome {
                        Ok(IngestOutcome::Stored { .. }) => summary.stored += 1,
                        Ok(IngestOutcome::StoredWithoutFiles) => summary.stored_without_files += 1,
                        Ok(IngestOutcome::Skipped { .. }) => summary.skipped += 1,
                        Ok(IngestOutcome::FailedIdentity) => summary.failed_identity += 1,
                        Ok(IngestOutcome::Deferred { .. }) => summary.deferred += 1,
                        // already logged by the builder
                        Err(_) => summary.errors += 1,
                    }
                }
            })
            .await;

        let summary = summary.into_inner().unwrap();
        info!(
            provider = provider.name(),
            discovered = summary.discovered,
            stored = summary.stored,
            skipped = summary.skipped,
            deferred = summary.deferred,
            errors = summary.errors,
            "Provider pass finished"
        );
        Ok(summary)
    }
}
