use lancache_sync_application::ports::{
    DomainListFetcher, RewriteDirectory, SnapshotStore, SourceIndexProvider,
};
use lancache_sync_application::services::RetryPolicy;
use lancache_sync_domain::Config;
use lancache_sync_infrastructure::adguard::AdGuardRewriteClient;
use lancache_sync_infrastructure::http::build_client;
use lancache_sync_infrastructure::snapshot::JsonSnapshotStore;
use lancache_sync_infrastructure::sources::{HttpListFetcher, HttpSourceIndex};
use std::sync::Arc;
use std::time::Duration;

/// Concrete implementations behind every port.
pub struct Adapters {
    pub index: Arc<dyn SourceIndexProvider>,
    pub fetcher: Arc<dyn DomainListFetcher>,
    pub directory: Arc<dyn RewriteDirectory>,
    pub snapshot_store: Option<Arc<dyn SnapshotStore>>,
}

impl Adapters {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let retry = RetryPolicy::from_config(&config.retry);
        let lists_client = build_client(Duration::from_secs(config.sync.fetch_timeout_secs))?;
        let api_client =
            build_client(Duration::from_secs(config.dns_server.request_timeout_secs))?;

        let snapshot_store = config
            .sync
            .cache_file_path
            .as_ref()
            .map(|path| Arc::new(JsonSnapshotStore::new(path)) as Arc<dyn SnapshotStore>);

        Ok(Self {
            index: Arc::new(HttpSourceIndex::new(
                lists_client.clone(),
                config.sources.index_url.clone(),
                retry.clone(),
            )),
            fetcher: Arc::new(HttpListFetcher::new(lists_client, retry.clone())),
            directory: Arc::new(AdGuardRewriteClient::new(
                api_client,
                &config.dns_server,
                retry,
            )),
            snapshot_store,
        })
    }
}
