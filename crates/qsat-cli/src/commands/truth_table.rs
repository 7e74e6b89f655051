//! Truth-table command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qsat_logic::BoolExpr;

use super::common::{ProblemArgs, load_problem, print_field, print_section, true_variables};
use crate::config::{OutputFormat, QsatConfig};

#[derive(Debug, Serialize)]
struct TruthTableReport<'a> {
    expression: String,
    variables: &'a [String],
    satisfying: Vec<SatisfyingRow>,
    count: usize,
    total: u64,
}

#[derive(Debug, Serialize)]
struct SatisfyingRow {
    bitstring: String,
    true_variables: Vec<String>,
}

/// Execute the truth-table command.
pub fn execute(args: &ProblemArgs, format: Option<&str>, config: &QsatConfig) -> Result<()> {
    let format = match format {
        Some(name) => OutputFormat::from_name(name)?,
        None => config.output.format,
    };

    let expr = load_problem(args)?;
    let table = expr
        .truth_table()
        .context("Failed to enumerate the expression")?;
    let satisfying = table.satisfying();
    let total = 1u64 << expr.num_variables();

    match format {
        OutputFormat::Json => {
            let report = TruthTableReport {
                expression: expr.to_string(),
                variables: expr.variables(),
                satisfying: satisfying
                    .iter()
                    .map(|&a| SatisfyingRow {
                        bitstring: expr.bitstring(a),
                        true_variables: set_variables(&expr, a),
                    })
                    .collect(),
                count: satisfying.len(),
                total,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_section("Expression");
            print_field("Expression", style(&expr).green());
            print_field("Variables", expr.variables().join(", "));
            print_field(
                "Satisfying",
                format!("{} of 2^{} = {}", satisfying.len(), expr.num_variables(), total),
            );

            if !satisfying.is_empty() {
                print_section("Solutions");
                for &assignment in &satisfying {
                    println!(
                        "  {}  {}",
                        style(expr.bitstring(assignment)).cyan(),
                        true_variables(&expr, assignment)
                    );
                }
            }
        }
    }

    Ok(())
}

fn set_variables(expr: &BoolExpr, assignment: u64) -> Vec<String> {
    expr.assignment_map(assignment)
        .into_iter()
        .filter_map(|(name, value)| value.then_some(name))
        .collect()
}
