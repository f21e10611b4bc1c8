use async_trait::async_trait;
use lancache_sync_domain::{DomainEntry, DomainError, Source};

/// Downloads the domain lists of one source.
///
/// Implementations retry transient failures themselves and surface
/// `DomainError::Fetch` once their retry budget is spent. Blank and comment
/// lines never reach the caller.
#[async_trait]
pub trait DomainListFetcher: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<Vec<DomainEntry>, DomainError>;
}
