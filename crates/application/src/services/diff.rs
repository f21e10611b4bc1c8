use lancache_sync_domain::{
    CacheSnapshot, DesiredSet, DiffPlan, PlannedRemoval, PlannedUpdate, RemoteRewrites,
};

/// Which remote rewrites the engine may delete.
#[derive(Debug, Clone, Copy)]
pub enum RemovalPolicy<'a> {
    Disabled,
    /// A remote rewrite is managed when it points at `target` and its domain
    /// was in the previously persisted desired set or still awaits removal.
    PreviouslyManaged {
        target: &'a str,
        previous: &'a CacheSnapshot,
    },
}

/// Compare the desired set against the server's current rewrites.
pub fn compute_plan(
    desired: &DesiredSet,
    remote: &RemoteRewrites,
    removal: RemovalPolicy<'_>,
) -> DiffPlan {
    let mut plan = DiffPlan::default();

    for rewrite in desired.iter() {
        match remote.answer(&rewrite.domain) {
            None => plan.to_add.push(rewrite.clone()),
            Some(answer) if answer == rewrite.target => plan.unchanged.push(rewrite.clone()),
            Some(answer) => plan.to_update.push(PlannedUpdate {
                rewrite: rewrite.clone(),
                old_target: answer.to_string(),
            }),
        }
    }

    if let RemovalPolicy::PreviouslyManaged { target, previous } = removal {
        plan.to_remove = remote
            .iter()
            .filter(|(domain, answer)| {
                *answer == target && previous.is_managed(domain) && !desired.contains(domain)
            })
            .map(|(domain, answer)| PlannedRemoval {
                domain: domain.to_string(),
                target: answer.to_string(),
            })
            .collect();
    }

    plan
}
