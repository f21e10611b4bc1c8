use async_trait::async_trait;
use lancache_sync_domain::{CacheSnapshot, DomainError};

/// Persistence for the last assembled desired set.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when no snapshot has been written yet.
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError>;

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError>;
}
