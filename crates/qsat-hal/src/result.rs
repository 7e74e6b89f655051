//! Measurement counts and execution results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measured bitstrings and how often each occurred.
///
/// Character `i` of a bitstring is classical bit `i`. Iteration and
/// serialization are ordered by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero if never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Outcomes in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The outcome with the highest count; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter()
            .fold(None, |best: Option<(&str, u64)>, (bits, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((bits, count)),
            })
    }

    /// Outcomes by descending count, then ascending bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Relative frequency of each outcome, in bitstring order.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> Vec<(&str, f64)> {
        let total = self.total_shots();
        if total == 0 {
            return vec![];
        }
        self.iter()
            .map(|(bits, count)| (bits, count as f64 / total as f64))
            .collect()
    }

    /// Fraction of shots whose outcome satisfies `predicate`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction_where(&self, mut predicate: impl FnMut(&str) -> bool) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        let hits: u64 = self
            .iter()
            .filter(|(bits, _)| predicate(bits))
            .map(|(_, count)| count)
            .sum();
        hits as f64 / total as f64
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bits, count) in iter {
            counts.insert(bits, count);
        }
        counts
    }
}

/// Result of running a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measured counts.
    pub counts: Counts,
    /// Shots requested.
    pub shots: u32,
    /// Time spent executing, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Record the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}
