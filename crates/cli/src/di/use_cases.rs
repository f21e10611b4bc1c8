use super::Adapters;
use lancache_sync_application::services::RewriteBuilder;
use lancache_sync_application::use_cases::{
    ListSourcesUseCase, ReconcileSettings, ReconcileUseCase,
};
use lancache_sync_domain::Config;
use std::sync::Arc;

pub struct UseCases {
    pub reconcile: Arc<ReconcileUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, adapters: Adapters) -> anyhow::Result<Self> {
        let mut builder = RewriteBuilder::new(config.target());
        if let Some(store) = adapters.snapshot_store {
            builder = builder.with_snapshot_store(store);
        }

        let reconcile = ReconcileUseCase::new(
            adapters.index,
            adapters.fetcher,
            config.sync.max_concurrent_fetches,
            builder,
            adapters.directory,
            ReconcileSettings::from_config(config)?,
        );

        Ok(Self {
            reconcile: Arc::new(reconcile),
        })
    }

    pub fn list_sources(adapters: &Adapters) -> ListSourcesUseCase {
        ListSourcesUseCase::new(Arc::clone(&adapters.index))
    }
}
