use crate::ports::DomainListFetcher;
use crate::services::RunBudget;
use futures::future::join_all;
use lancache_sync_domain::{DomainEntry, DomainError, Source};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Outcome of fetching one source. `order` is the source's catalog position.
#[derive(Debug)]
pub struct SourceFetch {
    pub order: usize,
    pub source: Source,
    pub result: Result<Vec<DomainEntry>, DomainError>,
}

/// Fan-out download of every selected source with bounded concurrency.
///
/// A failing source never cancels its siblings; each task returns its own
/// result to this single collector. When the run budget expires, fetches
/// still in flight resolve to `DomainError::Interrupted`.
pub struct FetchSourcesUseCase {
    fetcher: Arc<dyn DomainListFetcher>,
    max_concurrent: usize,
}

impl FetchSourcesUseCase {
    pub fn new(fetcher: Arc<dyn DomainListFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Results come back in `sources` order regardless of completion order.
    pub async fn execute(&self, sources: &[Source], budget: &RunBudget) -> Vec<SourceFetch> {
        info!(
            sources = sources.len(),
            max_concurrent = self.max_concurrent,
            "Fetching domain lists"
        );

        let permits = Arc::new(Semaphore::new(self.max_concurrent));

        let tasks: Vec<_> = sources
            .iter()
            .cloned()
            .map(|source| {
                let fetcher = Arc::clone(&self.fetcher);
                let permits = Arc::clone(&permits);
                let budget = budget.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        reason = budget.expired() => {
                            warn!(source = %source.id, reason = %reason, "Abandoning fetch");
                            Err(DomainError::Interrupted(reason.to_string()))
                        }
                        result = async {
                            let _permit = permits.acquire().await.map_err(|_| {
                                DomainError::Interrupted("fetch pool closed".to_string())
                            })?;
                            debug!(source = %source.id, "Fetch started");
                            fetcher.fetch(&source).await
                        } => result,
                    }
                })
            })
            .collect();

        let joined = join_all(tasks).await;

        sources
            .iter()
            .cloned()
            .zip(joined)
            .enumerate()
            .map(|(order, (source, joined))| {
                let result = joined.unwrap_or_else(|e| {
                    Err(DomainError::Fetch {
                        source_id: source.id.to_string(),
                        cause: format!("fetch task failed: {}", e),
                    })
                });
                match &result {
                    Ok(entries) => {
                        info!(source = %source.id, entries = entries.len(), "Fetched domain list")
                    }
                    Err(e) => warn!(source = %source.id, error = %e, "Domain list unavailable"),
                }
                SourceFetch {
                    order,
                    source,
                    result,
                }
            })
            .collect()
    }
}
