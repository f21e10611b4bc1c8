use crate::ports::SourceIndexProvider;
use crate::services::SourceCatalog;
use lancache_sync_domain::{DomainError, ServiceListing};
use std::sync::Arc;

/// Use case: list the sources an operator can select
pub struct ListSourcesUseCase {
    index: Arc<dyn SourceIndexProvider>,
}

impl ListSourcesUseCase {
    pub fn new(index: Arc<dyn SourceIndexProvider>) -> Self {
        Self { index }
    }

    pub async fn execute(&self) -> Result<Vec<ServiceListing>, DomainError> {
        let index = self.index.fetch_index().await?;
        let catalog = SourceCatalog::from_index(index, self.index.location());
        Ok(catalog.available().cloned().collect())
    }
}
