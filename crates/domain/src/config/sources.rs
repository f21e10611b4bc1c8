use crate::source::SourceSelection;
use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Index of the uklans cache-domains project
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/uklans/cache-domains/master/cache_domains.json";

/// Which upstream domain lists to mirror
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Mirror every source listed in the index
    #[serde(default)]
    pub all: bool,

    /// Explicit source ids (e.g. ["steam", "epicgames"])
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default = "default_index_url")]
    pub index_url: String,
}

impl SourcesConfig {
    /// Resolve the two mutually exclusive selection modes into one value.
    pub fn selection(&self) -> Result<SourceSelection, ConfigError> {
        let names: Vec<String> = self
            .names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        match (self.all, names.is_empty()) {
            (true, true) => Ok(SourceSelection::All),
            (false, false) => Ok(SourceSelection::Explicit(names)),
            (true, false) => Err(ConfigError::ConflictingSourceSelection),
            (false, true) => Err(ConfigError::NoSourceSelection),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            all: false,
            names: vec![],
            index_url: default_index_url(),
        }
    }
}

/// Split a comma-separated `SERVICE_NAMES` value.
pub fn parse_service_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}
