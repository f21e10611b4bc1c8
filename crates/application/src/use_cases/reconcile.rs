use crate::ports::{DomainListFetcher, RewriteDirectory, SourceIndexProvider};
use crate::services::{
    compute_plan, DesiredSetAssembler, RemovalPolicy, RewriteBuilder, RunBudget, SourceBuild,
    SourceCatalog,
};
use crate::use_cases::fetch_sources::{FetchSourcesUseCase, SourceFetch};
use chrono::{DateTime, Utc};
use lancache_sync_domain::{
    CacheSnapshot, Config, ConfigError, DesiredRewrite, DesiredSet, DiffPlan, DomainError,
    FailureReason, PlannedRemoval, PlannedUpdate, RemoteRewrites, RunOutcome, SourceSelection,
    SyncPhase, SyncSummary,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Run-level switches, extracted once from [`Config`].
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub selection: SourceSelection,
    pub progress_batch_size: usize,
    pub strict: bool,
    pub remove_stale: bool,
    pub dry_run: bool,
    pub cache_max_age_secs: Option<u64>,
}

impl ReconcileSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            selection: config.source_selection()?,
            progress_batch_size: config.sync.progress_batch_size.max(1),
            strict: config.sync.strict,
            remove_stale: config.sync.remove_stale,
            dry_run: config.sync.dry_run,
            cache_max_age_secs: config.sync.cache_max_age_secs,
        })
    }
}

/// Use case: converge the DNS server's rewrite table onto the upstream lists.
///
/// Drives `Fetching → Building → Diffing → Applying → Reporting` and always
/// returns a summary; the run outcome lives in [`SyncSummary::outcome`].
pub struct ReconcileUseCase {
    index: Arc<dyn SourceIndexProvider>,
    fetch: FetchSourcesUseCase,
    builder: RewriteBuilder,
    directory: Arc<dyn RewriteDirectory>,
    settings: ReconcileSettings,
}

enum Mutation {
    Add(DesiredRewrite),
    Update(PlannedUpdate),
    Remove(PlannedRemoval),
}

impl Mutation {
    fn domain(&self) -> &str {
        match self {
            Self::Add(r) => &r.domain,
            Self::Update(u) => &u.rewrite.domain,
            Self::Remove(r) => &r.domain,
        }
    }
}

struct FetchStage {
    fetched: Vec<SourceFetch>,
    index_error: Option<String>,
}

/// Mutable state of one run: the forward-only phase, the summary and the
/// snapshot to persist once the run ends.
struct Run {
    phase: SyncPhase,
    summary: SyncSummary,
    next_snapshot: Option<CacheSnapshot>,
}

impl Run {
    fn new(dry_run: bool) -> Self {
        let mut summary = SyncSummary::new();
        summary.dry_run = dry_run;
        Self {
            phase: SyncPhase::Fetching,
            summary,
            next_snapshot: None,
        }
    }

    fn enter(&mut self, phase: SyncPhase) {
        debug_assert!(phase >= self.phase, "phase went backwards");
        if phase != self.phase {
            debug!(from = %self.phase, to = %phase, "Phase transition");
        }
        self.phase = phase;
        self.summary.last_phase = phase;
    }

    fn record_applied(&mut self, op: &Mutation) {
        match op {
            Mutation::Add(_) => self.summary.added += 1,
            Mutation::Update(_) => self.summary.updated += 1,
            Mutation::Remove(r) => {
                self.summary.removed += 1;
                if let Some(next) = self.next_snapshot.as_mut() {
                    next.pending_removals.remove(&r.domain);
                }
            }
        }
    }

    fn record_failed(&mut self, op: &Mutation, error: &DomainError) {
        match op {
            Mutation::Remove(_) => self.summary.removal_failed += 1,
            _ => self.summary.failed += 1,
        }
        self.summary.errors.push(error.to_string());
    }

    fn record_skipped(&mut self, ops: &[Mutation]) {
        for op in ops {
            match op {
                Mutation::Remove(_) => self.summary.removal_skipped += 1,
                _ => self.summary.not_attempted += 1,
            }
        }
    }
}

impl ReconcileUseCase {
    pub fn new(
        index: Arc<dyn SourceIndexProvider>,
        fetcher: Arc<dyn DomainListFetcher>,
        max_concurrent_fetches: usize,
        builder: RewriteBuilder,
        directory: Arc<dyn RewriteDirectory>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            index,
            fetch: FetchSourcesUseCase::new(fetcher, max_concurrent_fetches),
            builder,
            directory,
            settings,
        }
    }

    pub async fn execute(&self, budget: &RunBudget) -> SyncSummary {
        info!(cache_target = %self.builder.target(), dry_run = self.settings.dry_run, "Reconciliation started");

        let mut run = Run::new(self.settings.dry_run);
        let previous = self.builder.load_snapshot().await;
        let result = self.drive(&mut run, budget, previous.as_ref()).await;
        self.write_snapshot(&mut run, previous.as_ref()).await;

        match result {
            Ok(()) => {
                run.enter(SyncPhase::Reporting);
                run.summary.outcome = RunOutcome::Succeeded;
            }
            Err(reason) => {
                run.summary.outcome = RunOutcome::Failed(reason);
            }
        }

        report(&run.summary);
        run.summary
    }

    async fn drive(
        &self,
        run: &mut Run,
        budget: &RunBudget,
        previous: Option<&CacheSnapshot>,
    ) -> Result<(), FailureReason> {
        run.enter(SyncPhase::Fetching);

        let desired = match self.fresh_snapshot(previous) {
            Some((desired, generated_at)) => {
                info!(entries = desired.len(), "Using fresh cache snapshot, skipping fetch");
                run.summary.from_cache = true;
                run.enter(SyncPhase::Building);
                if !self.settings.dry_run {
                    run.next_snapshot = Some(next_snapshot(&desired, generated_at, previous));
                }
                desired
            }
            None => {
                let stage = self.fetch_sources(budget).await?;
                run.enter(SyncPhase::Building);
                self.build_desired(run, stage, previous)?
            }
        };
        run.summary.domains_built = desired.len();

        run.enter(SyncPhase::Diffing);
        let remote = self.read_remote(budget).await?;
        let target = self.builder.target();
        if let Some(next) = run.next_snapshot.as_mut() {
            next.pending_removals
                .retain(|domain| remote.answer(domain) == Some(target));
        }

        let degraded = run.summary.stale || run.summary.sources_failed > 0;
        let removal = match (previous, self.settings.remove_stale, degraded) {
            (Some(previous), true, false) => RemovalPolicy::PreviouslyManaged { target, previous },
            (_, true, _) => {
                info!("Stale rewrite removal skipped: no complete previous snapshot or degraded run");
                RemovalPolicy::Disabled
            }
            _ => RemovalPolicy::Disabled,
        };
        let plan = compute_plan(&desired, &remote, removal);
        info!(
            desired = desired.len(),
            remote = remote.len(),
            add = plan.to_add.len(),
            update = plan.to_update.len(),
            remove = plan.to_remove.len(),
            unchanged = plan.unchanged.len(),
            "Diff computed"
        );

        run.enter(SyncPhase::Applying);
        self.apply(run, plan, budget).await
    }

    fn fresh_snapshot(
        &self,
        previous: Option<&CacheSnapshot>,
    ) -> Option<(DesiredSet, DateTime<Utc>)> {
        let max_age = self.settings.cache_max_age_secs?;
        let snapshot = previous?;
        snapshot
            .is_fresh(max_age, Utc::now())
            .then(|| (snapshot.desired_set(self.builder.target()), snapshot.generated_at))
    }

    /// Persist the snapshot prepared by this run, if any. Failures are
    /// recorded but never change the outcome.
    async fn write_snapshot(&self, run: &mut Run, previous: Option<&CacheSnapshot>) {
        let Some(next) = run.next_snapshot.take() else {
            return;
        };
        if previous == Some(&next) {
            debug!("Cache snapshot unchanged");
            return;
        }
        if let Err(e) = self.builder.persist(&next).await {
            warn!(error = %e, "Failed to write cache snapshot");
            run.summary.errors.push(e.to_string());
        }
    }

    async fn fetch_sources(&self, budget: &RunBudget) -> Result<FetchStage, FailureReason> {
        let index = tokio::select! {
            reason = budget.expired() => return Err(reason),
            index = self.index.fetch_index() => index,
        };

        let index = match index {
            Ok(index) => index,
            Err(e) => {
                warn!(location = %self.index.location(), error = %e, "Source index unavailable");
                return Ok(FetchStage {
                    fetched: vec![],
                    index_error: Some(e.to_string()),
                });
            }
        };

        let catalog = SourceCatalog::from_index(index, self.index.location());
        let sources = catalog.resolve(&self.settings.selection).map_err(|e| {
            error!(error = %e, "Source selection failed");
            failure_from(e)
        })?;
        let ids: Vec<&str> = sources.iter().map(|s| &*s.id).collect();
        info!(count = ids.len(), sources = ?ids, "Sources selected");

        let fetched = self.fetch.execute(&sources, budget).await;
        if let Some(reason) = budget.interruption() {
            return Err(reason);
        }

        Ok(FetchStage {
            fetched,
            index_error: None,
        })
    }

    fn build_desired(
        &self,
        run: &mut Run,
        stage: FetchStage,
        previous: Option<&CacheSnapshot>,
    ) -> Result<DesiredSet, FailureReason> {
        let mut first_failure = stage.index_error.clone();
        if let Some(e) = &stage.index_error {
            run.summary.errors.push(format!("source index: {}", e));
        }

        let mut builds = Vec::with_capacity(stage.fetched.len());
        for fetch in stage.fetched {
            match fetch.result {
                Ok(entries) => {
                    run.summary.sources_fetched += 1;
                    let output = self.builder.build(&entries);
                    if !output.invalid.is_empty() {
                        info!(
                            source = %fetch.source.id,
                            skipped = output.invalid.len(),
                            "Skipped entries failing the domain syntax check"
                        );
                    }
                    if output.duplicates > 0 {
                        debug!(
                            source = %fetch.source.id,
                            duplicates = output.duplicates,
                            "Collapsed repeated domains within source"
                        );
                    }
                    run.summary.invalid_skipped += output.invalid.len();
                    builds.push(SourceBuild {
                        order: fetch.order,
                        source_id: Arc::clone(&fetch.source.id),
                        rewrites: output.rewrites,
                    });
                }
                Err(e) => {
                    run.summary.sources_failed += 1;
                    let message = e.to_string();
                    first_failure.get_or_insert_with(|| message.clone());
                    run.summary.errors.push(message);
                }
            }
        }

        let fetch_complete = first_failure.is_none();
        if let (true, Some(cause)) = (self.settings.strict, first_failure) {
            return Err(FailureReason::SourceFailed(cause));
        }

        if builds.is_empty() {
            return match previous {
                Some(snapshot) => {
                    warn!(
                        generated_at = %snapshot.generated_at,
                        entries = snapshot.rewrites.len(),
                        "No source could be fetched, operating on stale cache snapshot"
                    );
                    run.summary.stale = true;
                    run.summary.from_cache = true;
                    Ok(snapshot.desired_set(self.builder.target()))
                }
                None => Err(FailureReason::NoDesiredSet),
            };
        }

        let assembly = DesiredSetAssembler::assemble(builds);
        run.summary.collisions = assembly.collisions.len();

        if fetch_complete && !self.settings.dry_run {
            run.next_snapshot = Some(next_snapshot(&assembly.desired, Utc::now(), previous));
        }

        Ok(assembly.desired)
    }

    async fn read_remote(&self, budget: &RunBudget) -> Result<RemoteRewrites, FailureReason> {
        let entries = tokio::select! {
            reason = budget.expired() => return Err(reason),
            entries = self.directory.list() => entries,
        };
        let entries = entries.map_err(|e| {
            error!(error = %e, "Failed to read current rewrites");
            failure_from(e)
        })?;
        Ok(RemoteRewrites::from_entries(entries, self.builder.target()))
    }

    async fn apply(
        &self,
        run: &mut Run,
        plan: DiffPlan,
        budget: &RunBudget,
    ) -> Result<(), FailureReason> {
        run.summary.unchanged = plan.unchanged.len();

        if plan.is_converged() {
            info!("Rewrites already converged, nothing to apply");
            return Ok(());
        }

        if self.settings.dry_run {
            for r in &plan.to_add {
                info!(domain = %r.domain, answer = %r.target, "[dry-run] would add");
            }
            for u in &plan.to_update {
                info!(domain = %u.rewrite.domain, from = %u.old_target, to = %u.rewrite.target, "[dry-run] would update");
            }
            for r in &plan.to_remove {
                info!(domain = %r.domain, answer = %r.target, "[dry-run] would remove");
            }
            run.summary.added = plan.to_add.len();
            run.summary.updated = plan.to_update.len();
            run.summary.removed = plan.to_remove.len();
            return Ok(());
        }

        let ops: Vec<Mutation> = plan
            .to_add
            .into_iter()
            .map(Mutation::Add)
            .chain(plan.to_update.into_iter().map(Mutation::Update))
            .chain(plan.to_remove.into_iter().map(Mutation::Remove))
            .collect();
        let total = ops.len();
        let batch_size = self.settings.progress_batch_size;

        let mut done = 0;
        for (batch_no, batch) in ops.chunks(batch_size).enumerate() {
            if let Some(reason) = budget.interruption() {
                warn!(applied = done, total, reason = %reason, "Stopping before next batch");
                run.record_skipped(&ops[done..]);
                return Err(reason);
            }

            for op in batch {
                match self.apply_one(op).await {
                    Ok(()) => run.record_applied(op),
                    Err(e) if e.is_fatal() => {
                        error!(domain = %op.domain(), error = %e, "Aborting apply");
                        run.record_failed(op, &e);
                        run.record_skipped(&ops[done + 1..]);
                        return Err(failure_from(e));
                    }
                    Err(e) => {
                        warn!(domain = %op.domain(), error = %e, "Rewrite not applied");
                        run.record_failed(op, &e);
                    }
                }
                done += 1;
            }

            info!(
                batch = batch_no + 1,
                applied = done,
                total,
                added = run.summary.added,
                updated = run.summary.updated,
                removed = run.summary.removed,
                failed = run.summary.failed + run.summary.removal_failed,
                "Apply progress"
            );
        }

        Ok(())
    }

    async fn apply_one(&self, op: &Mutation) -> Result<(), DomainError> {
        match op {
            Mutation::Add(r) => {
                debug!(domain = %r.domain, answer = %r.target, "Adding rewrite");
                self.directory.add(&r.domain, &r.target).await
            }
            Mutation::Update(u) => {
                debug!(domain = %u.rewrite.domain, from = %u.old_target, to = %u.rewrite.target, "Updating rewrite");
                self.directory
                    .update(&u.rewrite.domain, &u.old_target, &u.rewrite.target)
                    .await
            }
            Mutation::Remove(r) => {
                debug!(domain = %r.domain, answer = %r.target, "Removing rewrite");
                self.directory.remove(&r.domain, &r.target).await
            }
        }
    }
}

/// Snapshot of `desired`. Managed domains that dropped out of it are carried
/// as pending removals until the server no longer answers them with the target.
fn next_snapshot(
    desired: &DesiredSet,
    generated_at: DateTime<Utc>,
    previous: Option<&CacheSnapshot>,
) -> CacheSnapshot {
    let mut next = CacheSnapshot::capture(desired, generated_at);
    if let Some(previous) = previous {
        next.pending_removals = previous.delisted(desired).cloned().collect();
    }
    next
}

fn failure_from(e: DomainError) -> FailureReason {
    match e {
        DomainError::Authentication { .. } => FailureReason::Authentication(e.to_string()),
        DomainError::Configuration(_) | DomainError::UnknownSource(_) => {
            FailureReason::Configuration(e.to_string())
        }
        other => FailureReason::RemoteUnavailable(other.to_string()),
    }
}

fn report(summary: &SyncSummary) {
    match &summary.outcome {
        RunOutcome::Succeeded => info!(
            sources_fetched = summary.sources_fetched,
            sources_failed = summary.sources_failed,
            domains_built = summary.domains_built,
            invalid_skipped = summary.invalid_skipped,
            collisions = summary.collisions,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            unchanged = summary.unchanged,
            failed = summary.failed,
            stale = summary.stale,
            dry_run = summary.dry_run,
            "Reconciliation succeeded"
        ),
        RunOutcome::Failed(reason) => error!(
            phase = %summary.last_phase,
            reason = %reason,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            failed = summary.failed,
            not_attempted = summary.not_attempted,
            "Reconciliation failed"
        ),
    }
}
