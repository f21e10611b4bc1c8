use crate::http::fetch_text;
use async_trait::async_trait;
use lancache_sync_application::ports::SourceIndexProvider;
use lancache_sync_application::services::RetryPolicy;
use lancache_sync_domain::{DomainError, SourceIndex};
use tracing::{debug, instrument};

/// Reads the uklans `cache_domains.json` catalog over HTTP.
pub struct HttpSourceIndex {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl HttpSourceIndex {
    pub fn new(client: reqwest::Client, url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            url: url.into(),
            retry,
        }
    }
}

#[async_trait]
impl SourceIndexProvider for HttpSourceIndex {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_index(&self) -> Result<SourceIndex, DomainError> {
        let body = self
            .retry
            .run("fetch source index", |_| fetch_text(&self.client, &self.url))
            .await?;

        let index: SourceIndex =
            serde_json::from_str(&body).map_err(|e| DomainError::InvalidResponse {
                endpoint: self.url.clone(),
                detail: format!("not a cache_domains index: {}", e),
            })?;

        debug!(services = index.cache_domains.len(), "Source index loaded");
        Ok(index)
    }

    fn location(&self) -> &str {
        &self.url
    }
}
