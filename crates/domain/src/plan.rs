use crate::rewrite::DesiredRewrite;
use serde::{Deserialize, Serialize};

/// An update of an existing rewrite from `old_target` to `rewrite.target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedUpdate {
    pub rewrite: DesiredRewrite,
    pub old_target: String,
}

/// A managed rewrite that fell out of the desired set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRemoval {
    pub domain: String,
    pub target: String,
}

/// Work needed to converge the DNS server onto the desired set.
///
/// The four collections are disjoint by domain and each is sorted by domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPlan {
    pub to_add: Vec<DesiredRewrite>,
    pub to_update: Vec<PlannedUpdate>,
    pub unchanged: Vec<DesiredRewrite>,
    pub to_remove: Vec<PlannedRemoval>,
}

impl DiffPlan {
    /// True when applying the plan would issue no API call.
    pub fn is_converged(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    pub fn mutation_count(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_remove.len()
    }

    /// Size of the desired set this plan was computed from.
    pub fn desired_len(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.unchanged.len()
    }
}
