//! The Grover operator and the circuits built from it.

use qsat_ir::{Circuit, QubitId, StandardGate};
use tracing::instrument;

use crate::error::SearchResult;
use crate::problem::AmplificationProblem;

/// Build `Q = A · S₀ · A† · S_f`.
///
/// `S_f` is the oracle, `A` the state preparation and `S₀` flips the phase
/// of `|0…0⟩`. Applied to `A|0⟩`, `Q` rotates amplitude towards the states
/// the oracle marks.
pub fn grover_operator(problem: &AmplificationProblem) -> SearchResult<Circuit> {
    let prep = problem.state_preparation()?;
    let qubits = qubit_ids(&problem.oracle);

    let mut op = Circuit::with_layout_of("grover_op", &problem.oracle);
    op.compose(&problem.oracle, &qubits)?;
    op.compose(&prep.inverse()?, &qubits)?;
    reflect_zero(&mut op, &qubits)?;
    op.compose(&prep, &qubits)?;
    Ok(op)
}

/// `A` followed by `power` applications of the Grover operator, measured
/// into one classical bit per qubit when `measure` is set.
#[instrument(skip(problem), fields(qubits = problem.num_qubits()))]
pub fn construct_circuit(
    problem: &AmplificationProblem,
    power: usize,
    measure: bool,
) -> SearchResult<Circuit> {
    let prep = problem.state_preparation()?;
    let op = grover_operator(problem)?;
    let qubits = qubit_ids(&problem.oracle);

    let mut circuit = Circuit::with_layout_of(format!("grover_{power}"), &problem.oracle);
    circuit.compose(&prep, &qubits)?;
    for _ in 0..power {
        circuit.compose(&op, &qubits)?;
    }
    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

fn qubit_ids(circuit: &Circuit) -> Vec<QubitId> {
    circuit.qubits().iter().map(|q| q.id).collect()
}

fn reflect_zero(circuit: &mut Circuit, qubits: &[QubitId]) -> SearchResult<()> {
    circuit.apply_all(StandardGate::X)?;
    circuit.mcz(qubits)?;
    circuit.apply_all(StandardGate::X)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::PhaseOracle;

    fn problem(expr: &str) -> AmplificationProblem {
        AmplificationProblem::from_oracle(&PhaseOracle::from_expression(expr).unwrap())
    }

    #[test]
    fn test_operator_layout() {
        let op = grover_operator(&problem("a & b & c")).unwrap();
        let names: Vec<&str> = op.instructions().map(|i| i.name()).collect();
        assert_eq!(
            names,
            ["ccz", "h", "h", "h", "x", "x", "x", "ccz", "x", "x", "x", "h", "h", "h"]
        );
        assert!(!op.has_measurements());
    }

    #[test]
    fn test_power_zero_is_preparation_only() {
        let circuit = construct_circuit(&problem("a & b"), 0, true).unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts.get("h"), Some(&2));
        assert_eq!(counts.get("cz"), None);
        assert_eq!(circuit.num_clbits(), 2);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_power_repeats_operator() {
        let circuit = construct_circuit(&problem("a & b & c"), 3, false).unwrap();
        // one oracle and one zero reflection per application
        assert_eq!(circuit.count_ops().get("ccz"), Some(&6));
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.name(), "grover_3");
    }
}
