use crate::rewrite::DesiredSet;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Last successfully assembled desired set, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub generated_at: DateTime<Utc>,
    pub rewrites: BTreeMap<String, String>,
    /// Domains dropped from the lists whose server rewrite has not been
    /// removed yet. They stay managed until a removal succeeds.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pending_removals: BTreeSet<String>,
}

impl CacheSnapshot {
    pub fn capture(desired: &DesiredSet, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            rewrites: desired.to_mapping(),
            pending_removals: BTreeSet::new(),
        }
    }

    /// The cached domains, all pointed at the currently configured target.
    pub fn desired_set(&self, target: &str) -> DesiredSet {
        DesiredSet::from_domains(self.rewrites.keys(), target)
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.generated_at)
    }

    /// Snapshots dated in the future count as fresh.
    pub fn is_fresh(&self, max_age_secs: u64, now: DateTime<Utc>) -> bool {
        self.age(now).num_seconds() <= max_age_secs as i64
    }

    /// Listed in the last desired set or still awaiting removal.
    pub fn is_managed(&self, domain: &str) -> bool {
        self.rewrites.contains_key(domain) || self.pending_removals.contains(domain)
    }

    /// Managed domains that `desired` no longer contains.
    pub fn delisted<'a>(&'a self, desired: &'a DesiredSet) -> impl Iterator<Item = &'a String> {
        self.rewrites
            .keys()
            .chain(self.pending_removals.iter())
            .filter(move |domain| !desired.contains(domain))
    }
}
