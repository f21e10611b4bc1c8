use async_trait::async_trait;
use lancache_sync_domain::{DomainError, SourceIndex};

/// Provides the upstream catalog of available domain lists.
#[async_trait]
pub trait SourceIndexProvider: Send + Sync {
    async fn fetch_index(&self) -> Result<SourceIndex, DomainError>;

    /// Location the index was read from; list file paths are relative to it.
    fn location(&self) -> &str;
}
