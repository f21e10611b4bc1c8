use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One upstream domain list, identified by the service it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Arc<str>,
    /// Absolute URLs of the list files; a service may be split over several.
    pub list_urls: Vec<String>,
}

impl Source {
    pub fn new(id: impl Into<Arc<str>>, list_urls: Vec<String>) -> Self {
        Self {
            id: id.into(),
            list_urls,
        }
    }

    pub fn validate_id(id: &str) -> Result<(), String> {
        crate::validators::validate_source_id(id)
    }
}

/// How the operator picked sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Explicit(Vec<String>),
}

/// `cache_domains.json` as published by the cache-domains project.
///
/// `cache_domains` carries no serde default: an index without it is schema
/// drift and must fail to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceIndex {
    pub cache_domains: Vec<ServiceListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListing {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// List file paths, relative to the index location.
    pub domain_files: Vec<String>,
}

impl SourceIndex {
    pub fn names(&self) -> Vec<&str> {
        self.cache_domains.iter().map(|s| s.name.as_str()).collect()
    }
}
