use crate::di::{Adapters, UseCases};
use lancache_sync_domain::Config;
use tracing::info;

/// Print `name<TAB>description` for every selectable service.
pub async fn list_sources(config: &Config) -> anyhow::Result<i32> {
    config.validate_index()?;
    info!(index_url = %config.sources.index_url, "Listing available sources");

    let adapters = Adapters::new(config)?;
    let listings = UseCases::list_sources(&adapters).execute().await?;

    for listing in &listings {
        println!(
            "{}\t{}",
            listing.name,
            listing.description.as_deref().unwrap_or("")
        );
    }
    info!(count = listings.len(), "Sources listed");
    Ok(0)
}
