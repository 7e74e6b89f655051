//! Oracle command implementation.

use anyhow::{Context, Result};
use console::style;

use qsat_ir::qasm;
use qsat_search::PhaseOracle;

use super::common::{ProblemArgs, load_problem, print_field, print_section, resolve_synthesis};
use crate::config::QsatConfig;

/// Execute the oracle command.
pub fn execute(
    args: &ProblemArgs,
    synthesis: Option<&str>,
    emit_qasm: bool,
    draw: bool,
    config: &QsatConfig,
) -> Result<()> {
    let synthesis = resolve_synthesis(synthesis, config.search.synthesis)?;
    let expr = load_problem(args)?;
    let oracle =
        PhaseOracle::with_synthesis(expr, synthesis).context("Failed to build the phase oracle")?;
    let circuit = oracle.circuit();

    // QASM alone stays pipeable.
    if emit_qasm && !draw {
        print!("{}", qasm::emit(circuit));
        return Ok(());
    }

    print_section("Phase oracle");
    print_field("Expression", style(oracle.expression()).green());
    print_field("Synthesis", synthesis);
    print_field("Qubits", circuit.num_qubits());
    print_field("Gates", circuit.size());
    print_field("Depth", circuit.depth());
    print_field("Global phase", format!("{:.4}", circuit.global_phase()));

    let mut ops: Vec<(String, usize)> = circuit.count_ops().into_iter().collect();
    ops.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if !ops.is_empty() {
        print_section("Operations");
        for (name, count) in ops {
            println!("  {:<8} {}", style(name).cyan(), count);
        }
    }

    if draw {
        print_section("Circuit");
        print!("{circuit}");
    }
    if emit_qasm {
        print_section("OpenQASM 3");
        print!("{}", qasm::emit(circuit));
    }

    Ok(())
}
