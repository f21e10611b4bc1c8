//! Lancache Sync Domain Layer
pub mod config;
pub mod errors;
pub mod plan;
pub mod rewrite;
pub mod snapshot;
pub mod source;
pub mod summary;
pub mod validators;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use plan::{DiffPlan, PlannedRemoval, PlannedUpdate};
pub use rewrite::{
    normalize_domain, DesiredRewrite, DesiredSet, DomainEntry, RemoteRewrites, RewriteEntry,
};
pub use snapshot::CacheSnapshot;
pub use source::{ServiceListing, Source, SourceIndex, SourceSelection};
pub use summary::{FailureReason, RunOutcome, SyncPhase, SyncSummary};
