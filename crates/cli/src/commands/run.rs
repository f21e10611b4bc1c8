use crate::cli::RunArgs;
use crate::di::{Adapters, UseCases};
use lancache_sync_domain::{Config, SyncSummary};
use lancache_sync_jobs::RewriteSyncJob;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Reconcile once, or loop with `--every`. Returns the process exit code.
pub async fn run(config: &Config, args: &RunArgs) -> anyhow::Result<i32> {
    config.validate()?;
    info!(
        api = %config.dns_server.api_base_url,
        cache_target = %config.target(),
        index_url = %config.sources.index_url,
        max_concurrent_fetches = config.sync.max_concurrent_fetches,
        cache_file = ?config.sync.cache_file_path,
        dry_run = config.sync.dry_run,
        "Configuration loaded"
    );

    let adapters = Adapters::new(config)?;
    let use_cases = UseCases::new(config, adapters)?;

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());

    let job = RewriteSyncJob::new(Arc::clone(&use_cases.reconcile))
        .with_run_timeout(config.sync.run_timeout_secs.map(Duration::from_secs))
        .with_cancellation(shutdown.clone());

    let summary = match args.every {
        None => Some(job.run_once().await),
        Some(secs) => {
            let handle = Arc::new(job.with_interval(Duration::from_secs(secs.max(1)))).start();
            handle.await?
        }
    };

    Ok(match summary {
        Some(summary) => {
            print_summary(&summary)?;
            summary.outcome.exit_code()
        }
        None => 0,
    })
}

fn spawn_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Cannot listen for interrupt signal"),
        }
    });
}

/// One JSON line on stdout. Logs go to stderr.
fn print_summary(summary: &SyncSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(summary)?);
    Ok(())
}
