//! Solve command implementation.
//!
//! Parse the problem, build its phase oracle, run Grover rounds on the
//! simulator and chart the counts of the final round.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use qsat_adapter_sim::SimulatorBackend;
use qsat_hal::{Backend, Histogram};
use qsat_ir::qasm;
use qsat_search::{
    AmplificationProblem, Grover, GroverResult, IterationSchedule, PhaseOracle, Synthesis,
    construct_circuit,
};

use super::common::{
    ProblemArgs, load_problem, print_field, print_histogram, print_section, resolve_synthesis,
    spinner, true_variables,
};
use crate::config::{OutputFormat, QsatConfig};

/// Arguments of `qsat solve`.
#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub problem: ProblemArgs,

    /// Shots per round
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Fixed powers of the Grover operator, e.g. 1,2,3
    #[arg(
        short,
        long,
        value_delimiter = ',',
        conflicts_with_all = ["optimal", "growth_rate"]
    )]
    pub iterations: Vec<usize>,

    /// Use the optimal power for the classically counted solutions
    #[arg(long, conflicts_with = "growth_rate")]
    pub optimal: bool,

    /// Growth rate of the power schedule
    #[arg(long)]
    pub growth_rate: Option<f64>,

    /// Sample powers below each scheduled one
    #[arg(long)]
    pub sample_from_iterations: bool,

    /// Seed for the simulator and the sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Oracle synthesis (anf, minterm)
    #[arg(long)]
    pub synthesis: Option<String>,

    /// Output format (table, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print the oracle circuit
    #[arg(long)]
    pub show_circuit: bool,

    /// Print the first round's circuit as OpenQASM 3
    #[arg(long)]
    pub qasm: bool,
}

impl SolveArgs {
    /// Layer the flags over `config`.
    fn apply(&self, config: &mut QsatConfig) -> Result<()> {
        if let Some(shots) = self.shots {
            config.search.shots = shots;
        }
        if let Some(rate) = self.growth_rate {
            config.search.growth_rate = rate;
        }
        if self.sample_from_iterations {
            config.search.sample_from_iterations = true;
        }
        if let Some(seed) = self.seed {
            config.simulator.seed = Some(seed);
        }
        config.search.synthesis =
            resolve_synthesis(self.synthesis.as_deref(), config.search.synthesis)?;
        if let Some(format) = &self.format {
            config.output.format = OutputFormat::from_name(format)?;
        }
        config.validate()?;
        Ok(())
    }

    fn schedule(&self, config: &QsatConfig, oracle: &PhaseOracle) -> Result<IterationSchedule> {
        if !self.iterations.is_empty() {
            return Ok(IterationSchedule::Fixed(self.iterations.clone()));
        }
        if self.optimal {
            let num_solutions = oracle.truth_table().count_satisfying();
            if num_solutions == 0 {
                anyhow::bail!("The expression is unsatisfiable; --optimal needs a solution");
            }
            return Ok(IterationSchedule::Optimal { num_solutions });
        }
        Ok(IterationSchedule::Growth {
            rate: config.search.growth_rate,
        })
    }
}

/// JSON document printed by `--format json`.
#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    expression: String,
    variables: &'a [String],
    synthesis: Synthesis,
    classical_solutions: usize,
    assignment: Option<Vec<VariableValue<'a>>>,
    result: &'a GroverResult,
}

#[derive(Debug, Serialize)]
struct VariableValue<'a> {
    variable: &'a str,
    value: bool,
}

/// Execute the solve command.
pub async fn execute(args: &SolveArgs, config: &QsatConfig) -> Result<()> {
    let mut config = config.clone();
    args.apply(&mut config)?;
    let table = config.output.format == OutputFormat::Table;

    let expr = load_problem(&args.problem)?;
    let oracle = PhaseOracle::with_synthesis(expr, config.search.synthesis)
        .context("Failed to build the phase oracle")?;
    let problem = AmplificationProblem::from_oracle(&oracle);
    let schedule = args.schedule(&config, &oracle)?;

    let mut grover = Grover::default()
        .with_shots(config.search.shots)
        .with_schedule(schedule.clone())
        .with_sample_from_iterations(config.search.sample_from_iterations);
    let mut backend = SimulatorBackend::with_max_qubits(config.simulator.max_qubits);
    if let Some(seed) = config.simulator.seed {
        grover = grover.with_seed(seed);
        backend = backend.with_seed(seed);
    }

    if table {
        println!(
            "{} Solving {} on {} ({} variables, {} oracle)",
            style("→").cyan().bold(),
            style(oracle.expression()).green(),
            style(backend.name()).yellow(),
            oracle.num_qubits(),
            config.search.synthesis
        );
        if args.show_circuit {
            print_section("Oracle");
            print!("{}", oracle.circuit());
        }
        if args.qasm {
            let first = schedule.powers(oracle.num_qubits())?.first().copied().unwrap_or(0);
            let circuit = construct_circuit(&problem, first, true)?;
            print_section(&format!("OpenQASM (power {first})"));
            print!("{}", qasm::emit(&circuit));
        }
    }

    let progress = table.then(|| spinner("Running Grover search..."));
    let outcome = grover.amplify(&backend, &problem).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    let result = outcome.context("Grover search failed")?;

    let assignment = result.assignment.filter(|_| result.oracle_evaluation);
    match config.output.format {
        OutputFormat::Json => {
            let report = SolveReport {
                expression: oracle.expression().to_string(),
                variables: oracle.variables(),
                synthesis: config.search.synthesis,
                classical_solutions: oracle.truth_table().count_satisfying(),
                assignment: assignment.map(|a| {
                    oracle
                        .variables()
                        .iter()
                        .enumerate()
                        .map(|(i, variable)| VariableValue {
                            variable,
                            value: (a >> i) & 1 == 1,
                        })
                        .collect()
                }),
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_summary(&oracle, &result, assignment);
            if let Some(counts) = result.final_counts() {
                print_section(&format!("Histogram ({} shots)", counts.total_shots()));
                let histogram = Histogram::new(
                    counts,
                    config.output.order,
                    Some(config.output.max_rows),
                    Histogram::DEFAULT_WIDTH,
                )
                .mark_with(|bits| problem.is_good(bits));
                print_histogram(&histogram);
            }
        }
    }

    Ok(())
}

fn print_summary(oracle: &PhaseOracle, result: &GroverResult, assignment: Option<u64>) {
    print_section("Result");
    print_field("Rounds", result.rounds());
    print_field("Powers", format!("{:?}", result.applied_powers));
    if let Some(top) = &result.top_measurement {
        print_field("Top measurement", style(top).cyan().bold());
    }
    print_field(
        "Observed probability",
        format!("{:.1}%", result.max_probability * 100.0),
    );
    match assignment {
        Some(a) => {
            print_field("Satisfies", style("✓ yes").green().bold());
            print_field("True variables", true_variables(oracle.expression(), a));
        }
        None => print_field("Satisfies", style("✗ no solution found").red().bold()),
    }
}
