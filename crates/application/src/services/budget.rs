use lancache_sync_domain::FailureReason;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Wall-clock deadline plus external cancellation for one run.
#[derive(Debug, Clone)]
pub struct RunBudget {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RunBudget {
    pub fn new(timeout: Option<Duration>, cancel: CancellationToken) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, CancellationToken::new())
    }

    /// Non-blocking check.
    pub fn interruption(&self) -> Option<FailureReason> {
        if self.cancel.is_cancelled() {
            return Some(FailureReason::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(FailureReason::Timeout),
            _ => None,
        }
    }

    /// Resolves when the deadline passes or the token is cancelled.
    pub async fn expired(&self) -> FailureReason {
        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = self.cancel.cancelled() => FailureReason::Cancelled,
            _ = deadline => FailureReason::Timeout,
        }
    }
}
