use lancache_sync_domain::{DomainError, ServiceListing, Source, SourceIndex, SourceSelection};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use url::Url;

/// Resolves a source selection against the upstream index.
///
/// Sources come out sorted by id so cross-source collisions resolve the same
/// way on every run.
pub struct SourceCatalog {
    listings: BTreeMap<String, ServiceListing>,
    base_url: String,
}

impl SourceCatalog {
    pub fn from_index(index: SourceIndex, index_url: &str) -> Self {
        let mut listings = BTreeMap::new();
        for listing in index.cache_domains {
            let id = listing.name.trim().to_string();
            if let Err(reason) = Source::validate_id(&id) {
                warn!(name = %listing.name, reason = %reason, "Skipping index entry");
                continue;
            }
            if listings.contains_key(&id) {
                warn!(id = %id, "Duplicate index entry, keeping the first");
                continue;
            }
            listings.insert(id, listing);
        }

        Self {
            listings,
            base_url: index_url.to_string(),
        }
    }

    /// Every listing, sorted by id.
    pub fn available(&self) -> impl Iterator<Item = &ServiceListing> {
        self.listings.values()
    }

    pub fn resolve(&self, selection: &SourceSelection) -> Result<Vec<Source>, DomainError> {
        let ids: BTreeSet<&str> = match selection {
            SourceSelection::All => self.listings.keys().map(String::as_str).collect(),
            SourceSelection::Explicit(names) => {
                let mut ids = BTreeSet::new();
                for name in names {
                    let id = name.trim();
                    if !self.listings.contains_key(id) {
                        return Err(DomainError::UnknownSource(id.to_string()));
                    }
                    ids.insert(id);
                }
                ids
            }
        };

        let mut sources = Vec::with_capacity(ids.len());
        for (id, listing) in ids
            .into_iter()
            .filter_map(|id| self.listings.get(id).map(|l| (id, l)))
        {
            let urls = listing
                .domain_files
                .iter()
                .map(|path| {
                    join_url(&self.base_url, path).map_err(|e| DomainError::InvalidResponse {
                        endpoint: self.base_url.clone(),
                        detail: format!("list path '{}' for {}: {}", path, id, e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            sources.push(Source::new(id, urls));
        }

        debug!(count = sources.len(), "Sources resolved");
        Ok(sources)
    }
}

/// Resolve a list path from the index against the index URL (RFC 3986).
pub fn join_url(base: &str, path: &str) -> Result<String, url::ParseError> {
    Ok(Url::parse(base)?.join(path)?.to_string())
}
