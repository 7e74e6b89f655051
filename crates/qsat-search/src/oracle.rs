//! Phase oracles synthesised from Boolean expressions.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use qsat_ir::{Circuit, QubitId, cancel_adjacent_inverses};
use qsat_logic::{BoolExpr, TruthTable, dimacs};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{SearchError, SearchResult};

/// How the oracle circuit is derived from the truth table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synthesis {
    /// One multi-controlled Z per monomial of the algebraic normal form.
    #[default]
    Anf,
    /// One X-conjugated multi-controlled Z per satisfying assignment.
    Minterm,
}

impl Synthesis {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Synthesis::Anf => "anf",
            Synthesis::Minterm => "minterm",
        }
    }
}

impl fmt::Display for Synthesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Synthesis {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anf" => Ok(Synthesis::Anf),
            "minterm" | "minterms" => Ok(Synthesis::Minterm),
            _ => Err(SearchError::UnknownSynthesis(s.to_string())),
        }
    }
}

/// A circuit mapping `|x⟩` to `(-1)^f(x) |x⟩` for a Boolean function `f`.
///
/// The circuit has one qubit per variable and no ancillas. Qubit `i` is
/// labelled with the name of variable `i`, so a measured bitstring reads
/// left to right in the order the variables first appear in the expression.
#[derive(Debug, Clone)]
pub struct PhaseOracle {
    expression: BoolExpr,
    truth_table: TruthTable,
    synthesis: Synthesis,
    circuit: Circuit,
}

impl PhaseOracle {
    /// Parse an infix expression and synthesise its oracle.
    pub fn from_expression(source: &str) -> SearchResult<Self> {
        Self::new(qsat_logic::parse(source)?)
    }

    /// Parse a DIMACS CNF problem and synthesise its oracle.
    pub fn from_dimacs(source: &str) -> SearchResult<Self> {
        Self::new(dimacs::parse(source)?)
    }

    /// Synthesise the oracle of `expression` with the default method.
    pub fn new(expression: BoolExpr) -> SearchResult<Self> {
        Self::with_synthesis(expression, Synthesis::default())
    }

    /// Synthesise the oracle of `expression` with `synthesis`.
    #[instrument(skip(expression), fields(expression = %expression))]
    pub fn with_synthesis(expression: BoolExpr, synthesis: Synthesis) -> SearchResult<Self> {
        if expression.num_variables() == 0 {
            return Err(SearchError::NoVariables);
        }
        let truth_table = expression.truth_table()?;

        let mut circuit = Circuit::new("oracle");
        let qubits: Vec<QubitId> = expression
            .variables()
            .iter()
            .map(|name| circuit.add_named_qubit(name.as_str()))
            .collect();

        match synthesis {
            Synthesis::Anf => synthesize_anf(&mut circuit, &qubits, &truth_table)?,
            Synthesis::Minterm => {
                synthesize_minterms(&mut circuit, &qubits, &truth_table)?;
                circuit = cancel_adjacent_inverses(&circuit)?;
            }
        }

        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.size(),
            depth = circuit.depth(),
            solutions = truth_table.count_satisfying(),
            "synthesised phase oracle"
        );

        Ok(Self {
            expression,
            truth_table,
            synthesis,
            circuit,
        })
    }

    /// Evaluate the expression on a measured bitstring.
    pub fn evaluate_bitstring(&self, bits: &str) -> SearchResult<bool> {
        Ok(self.expression.evaluate_bitstring(bits)?)
    }

    /// Variable names, in qubit order.
    pub fn variables(&self) -> &[String] {
        self.expression.variables()
    }

    /// The expression this oracle marks.
    pub fn expression(&self) -> &BoolExpr {
        &self.expression
    }

    /// The enumerated truth table of the expression.
    pub fn truth_table(&self) -> &TruthTable {
        &self.truth_table
    }

    /// The method used to build the circuit.
    pub fn synthesis(&self) -> Synthesis {
        self.synthesis
    }

    /// The oracle circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of qubits, one per variable.
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

/// `(-1)^f` is the product of `(-1)^m` over the ANF monomials `m`, and each
/// of those is a phase flip of the all-ones state of the monomial's qubits.
fn synthesize_anf(circuit: &mut Circuit, qubits: &[QubitId], table: &TruthTable) -> SearchResult<()> {
    for mask in table.anf() {
        if mask == 0 {
            circuit.set_global_phase(circuit.global_phase() + PI);
            continue;
        }
        let operands: Vec<QubitId> = qubits
            .iter()
            .enumerate()
            .filter(|(i, _)| (mask >> i) & 1 == 1)
            .map(|(_, q)| *q)
            .collect();
        circuit.mcz(&operands)?;
    }
    Ok(())
}

fn synthesize_minterms(
    circuit: &mut Circuit,
    qubits: &[QubitId],
    table: &TruthTable,
) -> SearchResult<()> {
    if table.count_satisfying() == table.len() {
        circuit.set_global_phase(PI);
        return Ok(());
    }
    for assignment in table.satisfying() {
        let zeros: Vec<QubitId> = qubits
            .iter()
            .enumerate()
            .filter(|(i, _)| (assignment >> i) & 1 == 0)
            .map(|(_, q)| *q)
            .collect();
        for q in &zeros {
            circuit.x(*q)?;
        }
        circuit.mcz(qubits)?;
        for q in &zeros {
            circuit.x(*q)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsat_ir::StandardGate;

    const PARTY: &str = "((Olivia & Abe) | (Jin & Amira)) & ~(Abe & Amira)";

    #[test]
    fn test_qubits_named_after_variables() {
        let oracle = PhaseOracle::from_expression(PARTY).unwrap();
        assert_eq!(oracle.num_qubits(), 4);
        let labels: Vec<String> = oracle.circuit().qubits().iter().map(|q| q.to_string()).collect();
        assert_eq!(labels, ["Olivia[0]", "Abe[0]", "Jin[0]", "Amira[0]"]);
        assert_eq!(oracle.variables(), ["Olivia", "Abe", "Jin", "Amira"]);
    }

    #[test]
    fn test_single_and_is_one_mcz() {
        let oracle = PhaseOracle::from_expression("a & b & c & d").unwrap();
        let ops: Vec<_> = oracle.circuit().instructions().collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].as_gate(), Some(&StandardGate::MCZ { num_qubits: 4 }));
    }

    #[test]
    fn test_or_expands_to_three_terms() {
        let oracle = PhaseOracle::from_expression("a | b").unwrap();
        let counts = oracle.circuit().count_ops();
        assert_eq!(counts.get("z"), Some(&2));
        assert_eq!(counts.get("cz"), Some(&1));
        #[allow(clippy::float_cmp)]
        let no_phase = oracle.circuit().global_phase() == 0.0;
        assert!(no_phase);
    }

    #[test]
    fn test_negation_contributes_global_phase() {
        let oracle = PhaseOracle::from_expression("~a").unwrap();
        assert!((oracle.circuit().global_phase() - PI).abs() < 1e-12);
        assert_eq!(oracle.circuit().count_ops().get("z"), Some(&1));
    }

    #[test]
    fn test_constant_true_is_global_phase_only() {
        for synthesis in [Synthesis::Anf, Synthesis::Minterm] {
            let expr = qsat_logic::parse("a | ~a").unwrap();
            let oracle = PhaseOracle::with_synthesis(expr, synthesis).unwrap();
            assert_eq!(oracle.circuit().size(), 0);
            assert!((oracle.circuit().global_phase() - PI).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unsatisfiable_is_empty() {
        let oracle = PhaseOracle::from_expression("a & ~a").unwrap();
        assert_eq!(oracle.circuit().size(), 0);
        assert_eq!(oracle.truth_table().count_satisfying(), 0);
    }

    #[test]
    fn test_minterm_conjugation() {
        let expr = qsat_logic::parse("a & ~b").unwrap();
        let oracle = PhaseOracle::with_synthesis(expr, Synthesis::Minterm).unwrap();
        let names: Vec<&str> = oracle.circuit().instructions().map(|i| i.name()).collect();
        assert_eq!(names, ["x", "cz", "x"]);
        assert_eq!(oracle.synthesis(), Synthesis::Minterm);
    }

    #[test]
    fn test_minterm_cancels_between_terms() {
        // Solutions 00 and 10 share the X on b between their terms.
        let expr = qsat_logic::parse("(a | ~a) & ~b").unwrap();
        let oracle = PhaseOracle::with_synthesis(expr, Synthesis::Minterm).unwrap();
        let names: Vec<&str> = oracle.circuit().instructions().map(|i| i.name()).collect();
        // x(a) x(b) cz x(a) x(b) then x(b) cz x(b): the middle x(b) pair cancels
        assert_eq!(names, ["x", "x", "cz", "x", "cz", "x"]);
    }

    #[test]
    fn test_no_variables() {
        let result = PhaseOracle::from_expression("true");
        assert!(matches!(result, Err(SearchError::NoVariables)));
    }

    #[test]
    fn test_from_dimacs() {
        let oracle = PhaseOracle::from_dimacs("p cnf 2 1\n1 -2 0\n").unwrap();
        assert_eq!(oracle.variables(), ["x1", "x2"]);
        assert!(oracle.evaluate_bitstring("10").unwrap());
        assert!(!oracle.evaluate_bitstring("01").unwrap());
    }

    #[test]
    fn test_synthesis_names() {
        assert_eq!("ANF".parse::<Synthesis>().unwrap(), Synthesis::Anf);
        assert_eq!("minterm".parse::<Synthesis>().unwrap(), Synthesis::Minterm);
        assert!(matches!(
            "sop".parse::<Synthesis>(),
            Err(SearchError::UnknownSynthesis(_))
        ));
        assert_eq!(Synthesis::Minterm.to_string(), "minterm");
    }
}
