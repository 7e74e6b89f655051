//! Grover SAT Walkthrough
//!
//! Runs the built-in scenarios, or one picked by name, and charts the
//! measured counts of each.

use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use qsat_demos::runner::{DemoRunner, print_outcome};
use qsat_demos::scenarios::{self, Scenario};
use qsat_demos::{print_header, print_info, print_result, print_section, print_success};
use qsat_search::Synthesis;

#[derive(Parser, Debug)]
#[command(name = "demo-sat")]
#[command(about = "Walk through Grover search on Boolean satisfiability problems")]
struct Args {
    /// Scenario to run (party, single, 3sat, template); all when omitted
    scenario: Option<String>,

    /// List the scenarios and exit
    #[arg(long)]
    list: bool,

    /// Shots per round
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Use the growth schedule instead of the optimal power
    #[arg(long)]
    growth: bool,

    /// Oracle synthesis (anf, minterm)
    #[arg(long, default_value = "anf")]
    synthesis: String,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        print_header("qsat Scenarios");
        for scenario in scenarios::catalog() {
            print_result(scenario.name, scenario.description);
        }
        return;
    }

    let selected: Vec<&Scenario> = match &args.scenario {
        Some(name) => match scenarios::find(name) {
            Some(scenario) => vec![scenario],
            None => {
                eprintln!("Error: unknown scenario '{name}' (try --list)");
                std::process::exit(1);
            }
        },
        None => scenarios::catalog().iter().collect(),
    };

    let synthesis: Synthesis = match args.synthesis.parse() {
        Ok(synthesis) => synthesis,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut runner = DemoRunner::new()
        .with_shots(args.shots)
        .with_optimal(!args.growth)
        .with_synthesis(synthesis);
    if let Some(seed) = args.seed {
        runner = runner.with_seed(seed);
    }

    print_header("Grover Search for Boolean Satisfiability");
    print_info("Expression -> phase oracle -> Grover search -> histogram");

    let start = Instant::now();
    let pb = progress_bar(selected.len() as u64);
    let mut outcomes = Vec::with_capacity(selected.len());
    for scenario in &selected {
        pb.set_message(scenario.title);
        match runner.run(scenario).await {
            Ok(outcome) => outcomes.push((*scenario, outcome)),
            Err(e) => {
                pb.abandon();
                eprintln!("Error in scenario '{}': {e}", scenario.name);
                std::process::exit(1);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut solved = 0;
    for (scenario, outcome) in &outcomes {
        print_header(scenario.title);
        println!("  {}", scenario.description);
        print_result("Source", scenario.source_text());
        print_outcome(outcome);
        if outcome.result.oracle_evaluation {
            solved += 1;
        }
    }

    print_section("Summary");
    print_result("Scenarios", outcomes.len());
    print_result("Solved", solved);
    print_result("Elapsed", format!("{:.2?}", start.elapsed()));
    println!();
    print_success("Walkthrough complete!");
}
