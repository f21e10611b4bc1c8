use serde::{Deserialize, Serialize};

/// Rewrite management API of the DNS server (AdGuard Home)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DnsServerConfig {
    /// Base URL including scheme and port, e.g. "http://adguard.lan:3000"
    #[serde(default)]
    pub api_base_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Per-request timeout in seconds (default: 15)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Use the server's in-place update endpoint instead of delete+add (default: true)
    #[serde(default = "default_true")]
    pub atomic_update: bool,
}

impl DnsServerConfig {
    /// Endpoint prefix for every rewrite call.
    pub fn rewrite_endpoint(&self) -> String {
        format!("{}/control/rewrite", self.api_base_url.trim_end_matches('/'))
    }
}

fn default_request_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}
