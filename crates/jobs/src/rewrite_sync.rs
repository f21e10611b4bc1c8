use lancache_sync_application::services::RunBudget;
use lancache_sync_application::use_cases::ReconcileUseCase;
use lancache_sync_domain::{RunOutcome, SyncSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodic reconciliation for daemon mode.
///
/// The first run starts immediately. A run that outlasts the interval delays
/// the next tick instead of stacking runs.
pub struct RewriteSyncJob {
    reconcile: Arc<ReconcileUseCase>,
    interval: Duration,
    run_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl RewriteSyncJob {
    pub fn new(reconcile: Arc<ReconcileUseCase>) -> Self {
        Self {
            reconcile,
            interval: Duration::from_secs(3600),
            run_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_run_timeout(mut self, run_timeout: Option<Duration>) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// One reconciliation under a fresh wall-clock budget. Cancelling the
    /// job's token interrupts it.
    pub async fn run_once(&self) -> SyncSummary {
        let budget = RunBudget::new(self.run_timeout, self.shutdown.child_token());
        self.reconcile.execute(&budget).await
    }

    /// Spawn the loop. The handle resolves after shutdown with the summary of
    /// the last completed run, if any.
    pub fn start(self: Arc<Self>) -> JoinHandle<Option<SyncSummary>> {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting rewrite sync job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = None;

            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => {
                        info!("RewriteSyncJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let summary = self.run_once().await;
                        match &summary.outcome {
                            RunOutcome::Succeeded => info!(
                                added = summary.added,
                                updated = summary.updated,
                                removed = summary.removed,
                                "RewriteSyncJob: run completed"
                            ),
                            RunOutcome::Failed(reason) => {
                                error!(reason = %reason, "RewriteSyncJob: run failed")
                            }
                        }
                        last = Some(summary);
                    }
                }
            }

            last
        })
    }
}
