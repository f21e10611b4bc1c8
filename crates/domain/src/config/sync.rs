use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reconciliation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// IP address or hostname of the lancache server every rewrite points at
    #[serde(default)]
    pub cache_target_host: String,

    /// Maximum parallel list downloads (default: 8)
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Entries applied between two progress reports (default: 50)
    #[serde(default = "default_progress_batch_size")]
    pub progress_batch_size: usize,

    /// Snapshot of the last assembled desired set; enables stale fallback
    #[serde(default)]
    pub cache_file_path: Option<PathBuf>,

    /// Skip fetching entirely while the snapshot is younger than this
    #[serde(default)]
    pub cache_max_age_secs: Option<u64>,

    /// Fail the run when any single source cannot be fetched
    #[serde(default)]
    pub strict: bool,

    /// Delete managed rewrites that dropped out of the lists (default: false)
    #[serde(default)]
    pub remove_stale: bool,

    /// Compute and log the plan without calling any mutating endpoint
    #[serde(default)]
    pub dry_run: bool,

    /// Wall-clock budget for one run in seconds (default: 1800)
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: Option<u64>,

    /// Per-request timeout for list downloads in seconds (default: 30)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cache_target_host: String::new(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            progress_batch_size: default_progress_batch_size(),
            cache_file_path: None,
            cache_max_age_secs: None,
            strict: false,
            remove_stale: false,
            dry_run: false,
            run_timeout_secs: default_run_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_progress_batch_size() -> usize {
    50
}

fn default_run_timeout() -> Option<u64> {
    Some(1800)
}

fn default_fetch_timeout() -> u64 {
    30
}
