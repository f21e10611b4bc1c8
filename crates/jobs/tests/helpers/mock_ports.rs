#![allow(dead_code)]

use async_trait::async_trait;
use lancache_sync_application::ports::{DomainListFetcher, RewriteDirectory, SourceIndexProvider};
use lancache_sync_application::services::RewriteBuilder;
use lancache_sync_application::use_cases::{ReconcileSettings, ReconcileUseCase};
use lancache_sync_domain::{
    DomainEntry, DomainError, RewriteEntry, ServiceListing, Source, SourceIndex, SourceSelection,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub const TARGET: &str = "10.0.0.5";

pub struct StaticIndex;

#[async_trait]
impl SourceIndexProvider for StaticIndex {
    async fn fetch_index(&self) -> Result<SourceIndex, DomainError> {
        Ok(SourceIndex {
            cache_domains: vec![ServiceListing {
                name: "steam".to_string(),
                description: None,
                domain_files: vec!["steam.txt".to_string()],
            }],
        })
    }

    fn location(&self) -> &str {
        "http://lists.test/cache_domains.json"
    }
}

/// Serves `steam.com` after an optional delay.
pub struct SlowFetcher {
    pub delay: Duration,
}

#[async_trait]
impl DomainListFetcher for SlowFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<DomainEntry>, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(DomainEntry::from_line("steam.com", &source.id)
            .into_iter()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockRewriteDirectory {
    entries: Arc<RwLock<Vec<RewriteEntry>>>,
    list_calls: Arc<AtomicU64>,
}

impl MockRewriteDirectory {
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl RewriteDirectory for MockRewriteDirectory {
    async fn list(&self) -> Result<Vec<RewriteEntry>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.read().await.clone())
    }

    async fn add(&self, domain: &str, target: &str) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .push(RewriteEntry::new(domain, target));
        Ok(())
    }

    async fn update(&self, domain: &str, _old: &str, new_target: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.domain != domain);
        entries.push(RewriteEntry::new(domain, new_target));
        Ok(())
    }

    async fn remove(&self, domain: &str, _target: &str) -> Result<(), DomainError> {
        self.entries.write().await.retain(|e| e.domain != domain);
        Ok(())
    }
}

pub fn reconcile(directory: &MockRewriteDirectory, fetch_delay: Duration) -> Arc<ReconcileUseCase> {
    Arc::new(ReconcileUseCase::new(
        Arc::new(StaticIndex),
        Arc::new(SlowFetcher { delay: fetch_delay }),
        2,
        RewriteBuilder::new(TARGET),
        Arc::new(directory.clone()),
        ReconcileSettings {
            selection: SourceSelection::All,
            progress_batch_size: 10,
            strict: false,
            remove_stale: false,
            dry_run: false,
            cache_max_age_secs: None,
        },
    ))
}
