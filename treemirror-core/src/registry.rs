//! Per-run title registry.
//!
//! Two sets are tracked:
//! - *claimed* titles, handed out by [`TitleRegistry::claim`] while walking the
//!   tree so that collisions resolve the same way on every run;
//! - *synced* titles, recorded only after the remote create/update succeeded.
//!   The scrubber treats any remote page whose title is not synced as an orphan.

use std::collections::{BTreeSet, HashSet};

/// Append-only record of the titles handled during one run.
#[derive(Debug, Clone, Default)]
pub struct TitleRegistry {
    claimed: HashSet<String>,
    synced: BTreeSet<String>,
}

impl TitleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the first unclaimed title among `candidates`.
    ///
    /// When every candidate is taken, the last one gets a numeric suffix
    /// (`-2`, `-3`, ...). Returns `None` only for an empty candidate list.
    pub fn claim<I>(&mut self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut last = None;
        for candidate in candidates {
            if !self.claimed.contains(&candidate) {
                self.claimed.insert(candidate.clone());
                return Some(candidate);
            }
            last = Some(candidate);
        }

        let base = last?;
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.claimed.insert(candidate.clone()) {
                return Some(candidate);
            }
            n += 1;
        }
    }

    /// Record a successfully synchronized title. Returns `false` if it was
    /// already recorded.
    pub fn record(&mut self, title: &str) -> bool {
        self.synced.insert(title.to_owned())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.synced.contains(title)
    }

    pub fn len(&self) -> usize {
        self.synced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synced.is_empty()
    }

    /// Synced titles in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.synced.iter().map(String::as_str)
    }
}

/// Title candidates for an entry named `base` whose ancestors (outermost
/// first) are `ancestors`.
///
/// The bare name comes first, then path fragments are added from the nearest
/// ancestor outward until the full path is used:
/// `readme`, `readme-docs`, `readme-project-docs`.
///
/// Names are trimmed the same way page titles are, so every candidate is
/// exactly the title that ends up on the page.
pub fn title_candidates(base: &str, ancestors: &[String]) -> Vec<String> {
    let base = base.trim();
    let ancestors: Vec<&str> = ancestors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    let mut out = Vec::with_capacity(ancestors.len() + 1);
    out.push(base.to_owned());
    for take in 1..=ancestors.len() {
        let fragment = ancestors[ancestors.len() - take..].join("-");
        out.push(format!("{base}-{fragment}"));
    }
    out
}
