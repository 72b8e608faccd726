//! Named counters
//!
//! Every recovered defect and every ingested record is counted under a
//! label so a run can report what it encountered and healed.

use indexmap::IndexMap;
use serde::Serialize;

/// Labelled counters, reported in first-increment order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stats {
    counters: IndexMap<String, usize>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    pub fn add(&mut self, label: &str, n: usize) {
        if let Some(count) = self.counters.get_mut(label) {
            *count += n;
        } else {
            self.counters.insert(label.to_string(), n);
        }
    }

    /// Add every counter of `other` into this set
    pub fn absorb(&mut self, other: Stats) {
        for (label, n) in other.counters {
            self.add(&label, n);
        }
    }

    /// Current value of a counter, 0 when never incremented
    pub fn get(&self, label: &str) -> usize {
        self.counters.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counters.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
