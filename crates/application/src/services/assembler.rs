use lancache_sync_domain::{DesiredRewrite, DesiredSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Builder output for one source, tagged with the source's catalog position.
#[derive(Debug, Clone)]
pub struct SourceBuild {
    pub order: usize,
    pub source_id: Arc<str>,
    pub rewrites: Vec<DesiredRewrite>,
}

/// A domain claimed by more than one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub domain: String,
    pub kept_source: Option<Arc<str>>,
    pub dropped_source: Arc<str>,
    /// Targets differ; only possible with a contradictory configuration.
    pub conflicting_target: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub desired: DesiredSet,
    pub collisions: Vec<Collision>,
}

/// Merges per-source builds into one desired set.
pub struct DesiredSetAssembler;

impl DesiredSetAssembler {
    /// Merge in source order; the earliest source keeps a shared domain.
    /// The result does not depend on the order `builds` arrive in.
    pub fn assemble(mut builds: Vec<SourceBuild>) -> Assembly {
        builds.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.source_id.cmp(&b.source_id))
        });

        let mut assembly = Assembly::default();
        for build in builds {
            for rewrite in build.rewrites {
                let domain = rewrite.domain.clone();
                let target = rewrite.target.clone();
                if let Err(existing) = assembly.desired.insert_first(rewrite) {
                    let collision = Collision {
                        domain,
                        kept_source: existing.source_id.clone(),
                        dropped_source: Arc::clone(&build.source_id),
                        conflicting_target: existing.target != target,
                    };
                    if collision.conflicting_target {
                        warn!(
                            domain = %collision.domain,
                            kept = ?collision.kept_source,
                            dropped = %collision.dropped_source,
                            "Sources disagree on target; keeping the earlier source"
                        );
                    } else {
                        info!(
                            domain = %collision.domain,
                            kept = ?collision.kept_source,
                            dropped = %collision.dropped_source,
                            "Domain listed by more than one source"
                        );
                    }
                    assembly.collisions.push(collision);
                }
            }
        }

        assembly
    }
}
