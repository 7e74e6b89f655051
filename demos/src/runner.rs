//! Scenario runner: parse, build the oracle, search, chart.

use console::style;
use tracing::info;

use qsat_adapter_sim::SimulatorBackend;
use qsat_hal::{Counts, Histogram, HistogramOrder};
use qsat_search::{
    AmplificationProblem, Grover, GroverResult, PhaseOracle, SearchResult, Synthesis,
    success_probability,
};

use crate::scenarios::Scenario;
use crate::{print_result, print_section};

/// Outcome of one scenario run.
#[derive(Debug, Clone)]
pub struct DemoOutcome {
    /// Scenario name.
    pub name: &'static str,
    /// Expression as parsed.
    pub expression: String,
    /// Variable names, qubit order.
    pub variables: Vec<String>,
    /// Satisfying bitstrings by classical enumeration.
    pub classical_solutions: Vec<String>,
    /// Grover search result.
    pub result: GroverResult,
    /// Theoretical success probability of the last power.
    pub expected_probability: f64,
    /// Share of final-round shots that satisfy the expression.
    pub good_fraction: f64,
    /// Histogram of the final round, solutions marked.
    pub histogram: Histogram,
}

/// Runs catalog scenarios on the statevector simulator.
#[derive(Debug, Clone)]
pub struct DemoRunner {
    /// Shots per round.
    pub shots: u32,
    /// Seed for simulator and sampling.
    pub seed: Option<u64>,
    /// Use the optimal power instead of the growth schedule.
    pub optimal: bool,
    /// Oracle synthesis.
    pub synthesis: Synthesis,
    /// Histogram rows shown.
    pub max_rows: usize,
}

impl Default for DemoRunner {
    fn default() -> Self {
        Self {
            shots: 1024,
            seed: None,
            optimal: true,
            synthesis: Synthesis::Anf,
            max_rows: 16,
        }
    }
}

impl DemoRunner {
    /// Create a runner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose between the optimal power and the growth schedule.
    pub fn with_optimal(mut self, optimal: bool) -> Self {
        self.optimal = optimal;
        self
    }

    /// Set the oracle synthesis.
    pub fn with_synthesis(mut self, synthesis: Synthesis) -> Self {
        self.synthesis = synthesis;
        self
    }

    /// Run one scenario end to end.
    pub async fn run(&self, scenario: &Scenario) -> SearchResult<DemoOutcome> {
        let expr = scenario.expression()?;
        let oracle = PhaseOracle::with_synthesis(expr, self.synthesis)?;
        let problem = AmplificationProblem::from_oracle(&oracle);
        let num_solutions = oracle.truth_table().count_satisfying();

        let mut grover = Grover::default().with_shots(self.shots);
        // Unsatisfiable problems have no optimal power; fall back to growth.
        if self.optimal && num_solutions > 0 {
            grover = grover.with_optimal(num_solutions);
        }
        let mut backend = SimulatorBackend::new();
        if let Some(seed) = self.seed {
            grover = grover.with_seed(seed);
            backend = backend.with_seed(seed);
        }

        let result = grover.amplify(&backend, &problem).await?;
        info!(
            scenario = scenario.name,
            rounds = result.rounds(),
            found = result.oracle_evaluation,
            "scenario finished"
        );

        let last_power = result.applied_powers.last().copied().unwrap_or(0);
        let expected_probability =
            success_probability(num_solutions, oracle.num_qubits(), last_power);
        let (good_fraction, histogram) = match result.final_counts() {
            Some(counts) => (
                counts.fraction_where(|bits| problem.is_good(bits)),
                Histogram::new(
                    counts,
                    HistogramOrder::Bitstring,
                    Some(self.max_rows),
                    Histogram::DEFAULT_WIDTH,
                )
                .mark_with(|bits| problem.is_good(bits)),
            ),
            None => (0.0, Histogram::from_counts(&Counts::new())),
        };

        Ok(DemoOutcome {
            name: scenario.name,
            expression: oracle.expression().to_string(),
            variables: oracle.variables().to_vec(),
            classical_solutions: oracle.truth_table().satisfying_bitstrings(),
            result,
            expected_probability,
            good_fraction,
            histogram,
        })
    }
}

/// Print an outcome the way the walkthrough shows it.
pub fn print_outcome(outcome: &DemoOutcome) {
    print_section("Problem");
    print_result("Expression", style(&outcome.expression).green());
    print_result("Variables", outcome.variables.join(", "));
    print_result(
        "Classical solutions",
        format!(
            "{} of {}",
            outcome.classical_solutions.len(),
            1u64 << outcome.variables.len()
        ),
    );

    print_section("Grover search");
    print_result("Powers", format!("{:?}", outcome.result.applied_powers));
    print_result(
        "Expected success",
        format!("{:.1}%", outcome.expected_probability * 100.0),
    );
    print_result(
        "Observed success",
        format!("{:.1}%", outcome.good_fraction * 100.0),
    );
    match outcome.result.solution() {
        Some(bits) => print_result("Solution", style(bits).cyan().bold()),
        None => print_result("Solution", style("none found").red()),
    }

    print_section("Histogram");
    for row in outcome.histogram.rows() {
        let mark = if row.marked { " ✓" } else { "" };
        println!(
            "  {}: {:>5} {}{}",
            style(&row.bitstring).cyan(),
            row.count,
            style("█".repeat(row.bar_len)).blue(),
            style(mark).green().bold()
        );
    }
    if outcome.histogram.hidden() > 0 {
        println!("  ... and {} more outcomes", outcome.histogram.hidden());
    }
}
