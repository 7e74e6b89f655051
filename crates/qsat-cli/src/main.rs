//! qsat Command-Line Interface
//!
//! Solve Boolean satisfiability problems with Grover search on a
//! statevector simulator.
//!
//! ```text
//! qsat solve "((Olivia & Abe) | (Jin & Amira)) & ~(Abe & Amira)"
//! qsat solve --dimacs problem.cnf --optimal --format json
//! qsat solve -t "{a} & ~{b}" -b a=rain -b b=sun
//! qsat truth-table "a ^ b"
//! qsat oracle "a & b | c" --synthesis minterm --qasm
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::common::ProblemArgs;
use commands::{oracle, show_config, solve, truth_table, version};
use config::QsatConfig;

/// qsat - Grover search for Boolean satisfiability
#[derive(Parser, Debug)]
#[command(name = "qsat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, value_name = "PATH", env = "QSAT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for a satisfying assignment with Grover's algorithm
    Solve(solve::SolveArgs),

    /// List the satisfying assignments by classical enumeration
    TruthTable {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show the phase oracle synthesized for an expression
    Oracle {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Oracle synthesis (anf, minterm)
        #[arg(long)]
        synthesis: Option<String>,

        /// Print the oracle as OpenQASM 3
        #[arg(long)]
        qasm: bool,

        /// Print the gate list
        #[arg(long)]
        draw: bool,
    },

    /// Print the effective configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Version) {
        version::execute();
        return Ok(());
    }

    let config = QsatConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if !config.output.color {
        console::set_colors_enabled(false);
    }

    match cli.command {
        Commands::Solve(args) => solve::execute(&args, &config).await,
        Commands::TruthTable { problem, format } => {
            truth_table::execute(&problem, format.as_deref(), &config)
        }
        Commands::Oracle {
            problem,
            synthesis,
            qasm,
            draw,
        } => oracle::execute(&problem, synthesis.as_deref(), qasm, draw, &config),
        Commands::Config => show_config::execute(&config),
        Commands::Version => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("qsat").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_solve_expression() {
        let cli = parse(&["solve", "a & b", "--shots", "100", "--seed", "4"]).unwrap();
        match cli.command {
            Commands::Solve(args) => {
                assert_eq!(args.problem.expression.as_deref(), Some("a & b"));
                assert_eq!(args.shots, Some(100));
                assert_eq!(args.seed, Some(4));
                assert!(args.iterations.is_empty());
            }
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_iteration_list() {
        let cli = parse(&["solve", "a", "--iterations", "1,2,3"]).unwrap();
        match cli.command {
            Commands::Solve(args) => assert_eq!(args.iterations, vec![1, 2, 3]),
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_template_bindings() {
        let cli = parse(&["solve", "-t", "{p} & {q}", "-b", "p=x", "-b", "q=y"]).unwrap();
        match cli.command {
            Commands::Solve(args) => {
                assert!(args.problem.expression.is_none());
                assert_eq!(args.problem.bind, vec!["p=x", "q=y"]);
            }
            other => panic!("expected solve, got {other:?}"),
        }
    }

    #[test]
    fn test_problem_source_required() {
        assert!(parse(&["solve"]).is_err());
        assert!(parse(&["truth-table"]).is_err());
    }

    #[test]
    fn test_problem_sources_conflict() {
        assert!(parse(&["solve", "a", "--dimacs", "x.cnf"]).is_err());
        assert!(parse(&["solve", "--dimacs", "x.cnf", "-t", "{a}"]).is_err());
        assert!(parse(&["solve", "a", "-b", "p=x"]).is_err());
    }

    #[test]
    fn test_schedule_flags_conflict() {
        assert!(parse(&["solve", "a", "--optimal", "--iterations", "1"]).is_err());
        assert!(parse(&["solve", "a", "--optimal", "--growth-rate", "2"]).is_err());
    }

    #[test]
    fn test_parse_oracle_flags() {
        let cli = parse(&["oracle", "a | b", "--synthesis", "minterm", "--qasm"]).unwrap();
        match cli.command {
            Commands::Oracle {
                synthesis, qasm, draw, ..
            } => {
                assert_eq!(synthesis.as_deref(), Some("minterm"));
                assert!(qasm);
                assert!(!draw);
            }
            other => panic!("expected oracle, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse(&["config", "-vv", "--config", "/tmp/q.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/q.yaml")));
        assert!(matches!(cli.command, Commands::Config));
    }
}
