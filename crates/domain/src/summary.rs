use serde::Serialize;
use std::fmt;

/// Reconciliation state machine. Transitions only move forward; the run's
/// result is carried by [`RunOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Fetching,
    Building,
    Diffing,
    Applying,
    Reporting,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Building => "building",
            Self::Diffing => "diffing",
            Self::Applying => "applying",
            Self::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    Configuration(String),
    Authentication(String),
    RemoteUnavailable(String),
    /// Strict mode and at least one source could not be fetched.
    SourceFailed(String),
    /// No source fetched and no usable snapshot.
    NoDesiredSet,
    Timeout,
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(m) => write!(f, "configuration error: {}", m),
            Self::Authentication(m) => write!(f, "authentication failed: {}", m),
            Self::RemoteUnavailable(m) => write!(f, "DNS server unavailable: {}", m),
            Self::SourceFailed(m) => write!(f, "source fetch failed in strict mode: {}", m),
            Self::NoDesiredSet => f.write_str("no source could be fetched and no cache is usable"),
            Self::Timeout => f.write_str("run exceeded its wall-clock budget"),
            Self::Cancelled => f.write_str("run was cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed(FailureReason),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Process exit code for schedulers and health checks.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Succeeded => 0,
            Self::Failed(_) => 1,
        }
    }
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub outcome: RunOutcome,
    /// Last phase entered; `Reporting` only on success.
    pub last_phase: SyncPhase,
    pub sources_fetched: usize,
    pub sources_failed: usize,
    pub domains_built: usize,
    pub invalid_skipped: usize,
    pub collisions: usize,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Planned adds/updates never attempted because the run stopped early.
    pub not_attempted: usize,
    pub removal_failed: usize,
    pub removal_skipped: usize,
    /// The desired set came from the cache snapshot after every fetch failed.
    pub stale: bool,
    pub from_cache: bool,
    pub dry_run: bool,
    pub errors: Vec<String>,
}

impl SyncSummary {
    pub fn new() -> Self {
        Self {
            outcome: RunOutcome::Succeeded,
            last_phase: SyncPhase::Fetching,
            sources_fetched: 0,
            sources_failed: 0,
            domains_built: 0,
            invalid_skipped: 0,
            collisions: 0,
            added: 0,
            updated: 0,
            removed: 0,
            unchanged: 0,
            failed: 0,
            not_attempted: 0,
            removal_failed: 0,
            removal_skipped: 0,
            stale: false,
            from_cache: false,
            dry_run: false,
            errors: vec![],
        }
    }

    /// Desired-set entries accounted for by the apply phase.
    pub fn accounted(&self) -> usize {
        self.added + self.updated + self.unchanged + self.failed + self.not_attempted
    }
}

impl Default for SyncSummary {
    fn default() -> Self {
        Self::new()
    }
}
