use crate::ports::SnapshotStore;
use lancache_sync_domain::validators::validate_domain;
use lancache_sync_domain::{normalize_domain, CacheSnapshot, DesiredRewrite, DomainEntry, DomainError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rewrites built from one source's entries.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Accepted rewrites in first-seen order, unique by domain.
    pub rewrites: Vec<DesiredRewrite>,
    /// Lines that failed the domain syntax check.
    pub invalid: Vec<String>,
    /// Repeated domains within the same source.
    pub duplicates: usize,
}

/// Maps list entries to rewrites pointing at the cache server and owns the
/// on-disk snapshot of the assembled result.
pub struct RewriteBuilder {
    target: String,
    snapshot_store: Option<Arc<dyn SnapshotStore>>,
}

impl RewriteBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            snapshot_store: None,
        }
    }

    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshot_store = Some(store);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn build(&self, entries: &[DomainEntry]) -> BuildOutput {
        let mut output = BuildOutput::default();
        let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());

        for entry in entries {
            let Some(domain) = normalize_domain(&entry.domain) else {
                continue;
            };

            if let Err(reason) = validate_domain(&domain) {
                debug!(source = %entry.source_id, domain = %domain, reason = %reason, "Skipping invalid domain");
                output.invalid.push(domain);
                continue;
            }

            if !seen.insert(domain.clone()) {
                output.duplicates += 1;
                continue;
            }

            output.rewrites.push(DesiredRewrite::from_source(
                domain,
                self.target.as_str(),
                Arc::clone(&entry.source_id),
            ));
        }

        output
    }

    /// Load the previous snapshot. Read failures are logged and treated as
    /// "no snapshot": a broken cache must never block a live run.
    pub async fn load_snapshot(&self) -> Option<CacheSnapshot> {
        let store = self.snapshot_store.as_ref()?;
        match store.load().await {
            Ok(Some(snapshot)) => {
                debug!(
                    entries = snapshot.rewrites.len(),
                    generated_at = %snapshot.generated_at,
                    "Cache snapshot loaded"
                );
                Some(snapshot)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cache snapshot");
                None
            }
        }
    }

    /// Persist a snapshot. No-op without a configured store.
    pub async fn persist(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        let Some(store) = self.snapshot_store.as_ref() else {
            return Ok(());
        };
        store.save(snapshot).await?;
        info!(
            entries = snapshot.rewrites.len(),
            pending_removals = snapshot.pending_removals.len(),
            "Cache snapshot written"
        );
        Ok(())
    }
}
