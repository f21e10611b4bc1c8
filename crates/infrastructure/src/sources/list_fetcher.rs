use crate::http::fetch_text;
use async_trait::async_trait;
use lancache_sync_application::ports::DomainListFetcher;
use lancache_sync_application::services::RetryPolicy;
use lancache_sync_domain::{DomainEntry, DomainError, Source};
use tracing::debug;

/// Downloads every list file of a source and parses it line by line.
pub struct HttpListFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpListFetcher {
    pub fn new(client: reqwest::Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl DomainListFetcher for HttpListFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<DomainEntry>, DomainError> {
        let mut entries = Vec::new();

        for url in &source.list_urls {
            let body = self
                .retry
                .run("fetch domain list", |_| fetch_text(&self.client, url))
                .await
                .map_err(|e| DomainError::Fetch {
                    source_id: source.id.to_string(),
                    cause: e.to_string(),
                })?;

            let before = entries.len();
            entries.extend(
                body.lines()
                    .filter_map(|line| DomainEntry::from_line(line, &source.id)),
            );
            debug!(source = %source.id, url = %url, entries = entries.len() - before, "List file parsed");
        }

        Ok(entries)
    }
}
