//! Outcome of a Grover search.

use qsat_hal::Counts;
use serde::{Deserialize, Serialize};

/// What [`Grover::amplify`](crate::Grover::amplify) found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverResult {
    /// Scheduled powers of the Grover operator, one per round run.
    pub iterations: Vec<usize>,
    /// Powers actually applied. Differs from `iterations` only when powers
    /// are sampled.
    pub applied_powers: Vec<usize>,
    /// The outcome picked from the last round.
    pub top_measurement: Option<String>,
    /// `top_measurement` as an assignment, bit `i` holding variable `i`.
    pub assignment: Option<u64>,
    /// Whether the good-state check accepted `top_measurement`.
    pub oracle_evaluation: bool,
    /// Counts of every round, in order.
    pub circuit_results: Vec<Counts>,
    /// Observed frequency of the most common outcome in the last round.
    pub max_probability: f64,
    /// Shots per round.
    pub shots: u32,
}

impl GroverResult {
    /// Number of rounds run.
    pub fn rounds(&self) -> usize {
        self.circuit_results.len()
    }

    /// Counts of the last round, if any ran.
    pub fn final_counts(&self) -> Option<&Counts> {
        self.circuit_results.last()
    }

    /// The solution, if the search found one.
    pub fn solution(&self) -> Option<&str> {
        if self.oracle_evaluation {
            self.top_measurement.as_deref()
        } else {
            None
        }
    }
}
