use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Failed to fetch source {source_id}: {cause}")]
    Fetch { source_id: String, cause: String },

    #[error("DNS server rejected credentials (HTTP {status})")]
    Authentication { status: u16 },

    #[error("DNS server unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Failed to apply rewrite for {domain}: {cause}")]
    EntryApply { domain: String, cause: String },

    /// Retryable network condition (timeout, connection reset, 5xx).
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Unexpected response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: String, detail: String },

    #[error("Cache snapshot error: {0}")]
    Snapshot(String),

    /// The run budget expired or the run was cancelled.
    #[error("Run interrupted: {0}")]
    Interrupted(String),
}

impl DomainError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Errors after which no further API call can succeed in this run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::UnknownSource(_)
                | Self::Authentication { .. }
                | Self::RemoteUnavailable(_)
        )
    }
}
