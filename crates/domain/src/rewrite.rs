use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

/// A normalized line from a fetched domain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    pub source_id: Arc<str>,
}

impl DomainEntry {
    /// Parse one list line.
    ///
    /// - blank line        → None
    /// - `# comment`       → None
    /// - `  Steam.COM.  `  → `steam.com`
    pub fn from_line(line: &str, source_id: &Arc<str>) -> Option<Self> {
        normalize_domain(line).map(|domain| Self {
            domain,
            source_id: Arc::clone(source_id),
        })
    }
}

/// Case-fold and trim a raw domain; `None` for blank and comment lines.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// A rewrite the engine wants the DNS server to hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRewrite {
    pub domain: String,
    pub target: String,
    /// Source that contributed the domain; `None` when restored from a snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Arc<str>>,
}

impl DesiredRewrite {
    pub fn new(domain: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            source_id: None,
        }
    }

    pub fn from_source(
        domain: impl Into<String>,
        target: impl Into<String>,
        source_id: Arc<str>,
    ) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            source_id: Some(source_id),
        }
    }
}

/// Desired rewrites keyed by domain. Iteration is in domain order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSet {
    rewrites: BTreeMap<String, DesiredRewrite>,
}

impl DesiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the domain is already present; on conflict the existing
    /// entry is returned and the set is left untouched.
    pub fn insert_first(&mut self, rewrite: DesiredRewrite) -> Result<(), &DesiredRewrite> {
        match self.rewrites.entry(rewrite.domain.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(rewrite);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) => Err(slot.into_mut()),
        }
    }

    pub fn get(&self, domain: &str) -> Option<&DesiredRewrite> {
        self.rewrites.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.rewrites.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.rewrites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DesiredRewrite> {
        self.rewrites.values()
    }

    /// `domain → target`, the form persisted in the cache snapshot.
    pub fn to_mapping(&self) -> BTreeMap<String, String> {
        self.rewrites
            .values()
            .map(|r| (r.domain.clone(), r.target.clone()))
            .collect()
    }

    /// Every domain pointed at `target`.
    pub fn from_domains<'a>(domains: impl IntoIterator<Item = &'a String>, target: &str) -> Self {
        let rewrites = domains
            .into_iter()
            .map(|domain| (domain.clone(), DesiredRewrite::new(domain.as_str(), target)))
            .collect();
        Self { rewrites }
    }
}

/// Wire form of an AdGuard Home rewrite (`{"domain", "answer"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteEntry {
    pub domain: String,
    pub answer: String,
}

impl RewriteEntry {
    pub fn new(domain: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            answer: answer.into(),
        }
    }
}

/// The DNS server's current rewrites, one answer per domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRewrites {
    answers: BTreeMap<String, String>,
}

impl RemoteRewrites {
    /// Collapse the server's list into one answer per domain.
    ///
    /// The server allows several answers for one domain. If any of them equals
    /// `target` that one is kept, otherwise the first listed.
    pub fn from_entries(entries: Vec<RewriteEntry>, target: &str) -> Self {
        let mut answers: BTreeMap<String, String> = BTreeMap::new();
        for entry in entries {
            let domain = entry.domain.trim_end_matches('.').to_ascii_lowercase();
            match answers.entry(domain) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(entry.answer);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    if slot.get() != target && entry.answer == target {
                        slot.insert(entry.answer);
                    }
                }
            }
        }
        Self { answers }
    }

    pub fn answer(&self, domain: &str) -> Option<&str> {
        self.answers.get(domain).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(d, a)| (d.as_str(), a.as_str()))
    }
}
