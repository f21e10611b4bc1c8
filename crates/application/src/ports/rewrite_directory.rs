use async_trait::async_trait;
use lancache_sync_domain::{DomainError, RewriteEntry};

/// The DNS server's rewrite table.
///
/// This is the only port that mutates remote state. Every mutation must be
/// idempotent from the caller's side: re-adding an entry that already exists
/// with the same answer, or removing one that is already gone, succeeds.
///
/// Error contract:
/// - `DomainError::Authentication` on 401/403, never retried
/// - `DomainError::RemoteUnavailable` once transient failures exhaust the retry policy
/// - `DomainError::InvalidResponse` when a response cannot be interpreted
/// - `DomainError::EntryApply` when the server refuses one specific entry
#[async_trait]
pub trait RewriteDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<RewriteEntry>, DomainError>;

    async fn add(&self, domain: &str, target: &str) -> Result<(), DomainError>;

    async fn update(
        &self,
        domain: &str,
        old_target: &str,
        new_target: &str,
    ) -> Result<(), DomainError>;

    async fn remove(&self, domain: &str, target: &str) -> Result<(), DomainError>;
}
