//! Grover's search loop.
//!
//! Each round builds `A · Q^k` for the next power `k` of the schedule, runs
//! it on a backend and checks the picked outcome classically. The loop
//! stops at the first good outcome or when the schedule runs out.

use std::f64::consts::PI;

use qsat_hal::{Backend, Counts, HalError};
use qsat_logic::parse_bitstring;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{SearchError, SearchResult};
use crate::operator::construct_circuit;
use crate::problem::AmplificationProblem;
use crate::result::GroverResult;

/// Default shots per round.
pub const DEFAULT_SHOTS: u32 = 1024;

/// Default growth rate of [`IterationSchedule::Growth`].
pub const DEFAULT_GROWTH_RATE: f64 = 1.2;

/// Which powers of the Grover operator to try, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationSchedule {
    /// Exactly these powers.
    Fixed(Vec<usize>),
    /// The single power that maximises success for a known solution count.
    Optimal {
        /// Number of satisfying assignments.
        num_solutions: usize,
    },
    /// Powers `⌊rate^k⌋` for `k = 1, 2, …`, for unknown solution counts.
    Growth {
        /// Factor between successive powers. Must exceed 1.
        rate: f64,
    },
}

impl Default for IterationSchedule {
    fn default() -> Self {
        IterationSchedule::Growth {
            rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl IterationSchedule {
    /// The powers this schedule tries on a `num_qubits`-wide search.
    ///
    /// A growth schedule stops before the first power above
    /// `⌈2^(n/2)⌉` and after at most `max(10, 2^n)` rounds.
    pub fn powers(&self, num_qubits: usize) -> SearchResult<Vec<usize>> {
        match self {
            IterationSchedule::Fixed(powers) => {
                if powers.is_empty() {
                    return Err(SearchError::InvalidIterations(
                        "fixed schedule is empty".into(),
                    ));
                }
                Ok(powers.clone())
            }
            IterationSchedule::Optimal { num_solutions } => {
                if *num_solutions == 0 {
                    return Err(SearchError::InvalidIterations(
                        "optimal schedule needs at least one solution".into(),
                    ));
                }
                Ok(vec![optimal_num_iterations(*num_solutions, num_qubits)])
            }
            IterationSchedule::Growth { rate } => {
                if rate.is_nan() || *rate <= 1.0 {
                    return Err(SearchError::InvalidGrowthRate(*rate));
                }
                #[allow(clippy::cast_precision_loss)]
                let max_power = (num_qubits as f64 / 2.0).exp2().ceil();
                let max_rounds = 10usize.max(1usize << num_qubits.min(63));

                let mut powers = Vec::new();
                let mut scaled = 1.0f64;
                while powers.len() < max_rounds {
                    scaled *= rate;
                    let power = scaled.floor();
                    if power > max_power {
                        break;
                    }
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let power = power as usize;
                    powers.push(power);
                }
                Ok(powers)
            }
        }
    }
}

/// Settings of a [`Grover`] search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverOptions {
    /// Shots per round.
    pub shots: u32,
    /// Powers to try.
    pub schedule: IterationSchedule,
    /// Apply a uniformly random power below each scheduled one, and pick
    /// the outcome in proportion to its counts instead of the most frequent.
    pub sample_from_iterations: bool,
    /// Seed for the sampling above. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GroverOptions {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            schedule: IterationSchedule::default(),
            sample_from_iterations: false,
            seed: None,
        }
    }
}

/// Grover's search algorithm.
#[derive(Debug, Clone, Default)]
pub struct Grover {
    options: GroverOptions,
}

impl Grover {
    /// A search with explicit options.
    pub fn new(options: GroverOptions) -> Self {
        Self { options }
    }

    /// Set the shots per round.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.options.shots = shots;
        self
    }

    /// Set the schedule.
    pub fn with_schedule(mut self, schedule: IterationSchedule) -> Self {
        self.options.schedule = schedule;
        self
    }

    /// Try exactly these powers.
    pub fn with_iterations(self, powers: Vec<usize>) -> Self {
        self.with_schedule(IterationSchedule::Fixed(powers))
    }

    /// Use the optimal power for a known solution count.
    pub fn with_optimal(self, num_solutions: usize) -> Self {
        self.with_schedule(IterationSchedule::Optimal { num_solutions })
    }

    /// Grow the power by `rate` each round.
    pub fn with_growth_rate(self, rate: f64) -> Self {
        self.with_schedule(IterationSchedule::Growth { rate })
    }

    /// Enable or disable power and outcome sampling.
    pub fn with_sample_from_iterations(mut self, enabled: bool) -> Self {
        self.options.sample_from_iterations = enabled;
        self
    }

    /// Seed the sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    /// The search settings.
    pub fn options(&self) -> &GroverOptions {
        &self.options
    }

    /// Run the search on `backend`.
    #[instrument(skip_all, fields(backend = backend.name(), qubits = problem.num_qubits()))]
    pub async fn amplify(
        &self,
        backend: &dyn Backend,
        problem: &AmplificationProblem,
    ) -> SearchResult<GroverResult> {
        let num_qubits = problem.num_qubits();
        if num_qubits == 0 {
            return Err(SearchError::NoVariables);
        }
        let schedule = self.options.schedule.powers(num_qubits)?;
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut iterations = Vec::with_capacity(schedule.len());
        let mut applied_powers = Vec::with_capacity(schedule.len());
        let mut circuit_results: Vec<Counts> = Vec::with_capacity(schedule.len());
        let mut top_measurement = None;
        let mut max_probability = 0.0;
        let mut oracle_evaluation = false;

        for power in schedule {
            let applied = if self.options.sample_from_iterations && power > 0 {
                rng.gen_range(0..power)
            } else if self.options.sample_from_iterations {
                0
            } else {
                power
            };

            let circuit = construct_circuit(problem, applied, true)?;
            let result = backend.run(&circuit, self.options.shots).await?;
            let counts = result.counts;

            let Some((most_frequent, top_count)) = counts.most_frequent() else {
                return Err(SearchError::Backend(HalError::JobFailed(
                    "backend returned no counts".into(),
                )));
            };
            #[allow(clippy::cast_precision_loss)]
            let probability = top_count as f64 / counts.total_shots() as f64;
            let picked = if self.options.sample_from_iterations {
                sample_outcome(&counts, &mut rng).unwrap_or(most_frequent)
            } else {
                most_frequent
            };
            let picked = picked.to_string();

            oracle_evaluation = problem.is_good(&picked);
            debug!(power, applied, outcome = %picked, good = oracle_evaluation, "round finished");

            iterations.push(power);
            applied_powers.push(applied);
            max_probability = probability;
            top_measurement = Some(picked);
            circuit_results.push(counts);

            if oracle_evaluation {
                break;
            }
        }

        let assignment = top_measurement
            .as_deref()
            .and_then(|bits| parse_bitstring(bits, num_qubits).ok());

        info!(
            rounds = circuit_results.len(),
            found = oracle_evaluation,
            top = top_measurement.as_deref().unwrap_or("-"),
            "grover search finished"
        );

        Ok(GroverResult {
            iterations,
            applied_powers,
            top_measurement,
            assignment,
            oracle_evaluation,
            circuit_results,
            max_probability,
            shots: self.options.shots,
        })
    }
}

/// Draw an outcome with probability proportional to its count.
fn sample_outcome<'a, R: Rng>(counts: &'a Counts, rng: &mut R) -> Option<&'a str> {
    let total = counts.total_shots();
    if total == 0 {
        return None;
    }
    let mut target = rng.gen_range(0..total);
    for (bits, count) in counts.iter() {
        if target < count {
            return Some(bits);
        }
        target -= count;
    }
    None
}

/// The power `⌊π / (4·asin(√(M/N)))⌋` maximising the chance of measuring
/// one of `num_solutions` marked states among `2^num_qubits`.
///
/// Zero solutions give zero: no power helps.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn optimal_num_iterations(num_solutions: usize, num_qubits: usize) -> usize {
    if num_solutions == 0 {
        return 0;
    }
    let theta = angle(num_solutions, num_qubits);
    (PI / (4.0 * theta)).floor() as usize
}

/// Probability of measuring a marked state after `power` applications of
/// the Grover operator: `sin²((2k+1)·θ)` with `sin θ = √(M/N)`.
pub fn success_probability(num_solutions: usize, num_qubits: usize, power: usize) -> f64 {
    if num_solutions == 0 {
        return 0.0;
    }
    let theta = angle(num_solutions, num_qubits);
    #[allow(clippy::cast_precision_loss)]
    let turns = (2 * power + 1) as f64;
    (turns * theta).sin().powi(2)
}

#[allow(clippy::cast_precision_loss)]
fn angle(num_solutions: usize, num_qubits: usize) -> f64 {
    let space = (num_qubits as f64).exp2();
    (num_solutions as f64 / space).min(1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_num_iterations() {
        assert_eq!(optimal_num_iterations(1, 2), 1);
        assert_eq!(optimal_num_iterations(1, 3), 2);
        assert_eq!(optimal_num_iterations(1, 4), 3);
        assert_eq!(optimal_num_iterations(4, 4), 1);
        assert_eq!(optimal_num_iterations(3, 3), 1);
        assert_eq!(optimal_num_iterations(16, 4), 0);
        assert_eq!(optimal_num_iterations(0, 4), 0);
    }

    #[test]
    fn test_success_probability() {
        assert!((success_probability(1, 2, 1) - 1.0).abs() < 1e-12);
        assert!((success_probability(4, 4, 1) - 1.0).abs() < 1e-12);
        assert!((success_probability(1, 4, 3) - 0.9613).abs() < 1e-3);
        assert!((success_probability(3, 3, 1) - 0.8438).abs() < 1e-3);
        assert!((success_probability(1, 3, 2) - 0.9453).abs() < 1e-3);
        assert!((success_probability(1, 4, 0) - 1.0 / 16.0).abs() < 1e-12);
        assert!(success_probability(0, 4, 2).abs() < 1e-12);
    }

    #[test]
    fn test_growth_schedule() {
        let powers = IterationSchedule::default().powers(4).unwrap();
        // 1.2, 1.44, 1.73, 2.07, 2.49, 2.99, 3.58, 4.30 then 5.16 > 4
        assert_eq!(powers, vec![1, 1, 1, 2, 2, 2, 3, 4]);

        let doubling = IterationSchedule::Growth { rate: 2.0 }.powers(6).unwrap();
        assert_eq!(doubling, vec![2, 4, 8]);
    }

    #[test]
    fn test_growth_schedule_round_cap() {
        let slow = IterationSchedule::Growth { rate: 1.01 }.powers(2).unwrap();
        assert_eq!(slow.len(), 10);
        assert!(slow.iter().all(|&p| p == 1));
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(matches!(
            IterationSchedule::Growth { rate: 1.0 }.powers(3),
            Err(SearchError::InvalidGrowthRate(_))
        ));
        assert!(matches!(
            IterationSchedule::Growth { rate: f64::NAN }.powers(3),
            Err(SearchError::InvalidGrowthRate(_))
        ));
        assert!(matches!(
            IterationSchedule::Fixed(vec![]).powers(3),
            Err(SearchError::InvalidIterations(_))
        ));
        assert!(matches!(
            IterationSchedule::Optimal { num_solutions: 0 }.powers(3),
            Err(SearchError::InvalidIterations(_))
        ));
    }

    #[test]
    fn test_optimal_schedule() {
        let powers = IterationSchedule::Optimal { num_solutions: 1 }
            .powers(4)
            .unwrap();
        assert_eq!(powers, vec![3]);
    }

    #[test]
    fn test_sample_outcome_follows_counts() {
        let counts: Counts = [("01", 0u64), ("11", 5)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(sample_outcome(&counts, &mut rng), Some("11"));
        }
        assert_eq!(sample_outcome(&Counts::new(), &mut rng), None);
    }

    #[test]
    fn test_builder() {
        let grover = Grover::default()
            .with_shots(100)
            .with_iterations(vec![1, 2])
            .with_sample_from_iterations(true)
            .with_seed(9);
        assert_eq!(grover.options().shots, 100);
        assert_eq!(grover.options().schedule, IterationSchedule::Fixed(vec![1, 2]));
        assert!(grover.options().sample_from_iterations);
        assert_eq!(grover.options().seed, Some(9));
    }
}
