//! Amplitude-amplification problems.

use std::fmt;
use std::sync::Arc;

use qsat_ir::{Circuit, StandardGate};

use crate::error::{SearchError, SearchResult};
use crate::oracle::PhaseOracle;

/// Predicate deciding whether a measured bitstring is a solution.
pub type GoodStatePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// What Grover search amplifies: an oracle, the state it starts from, and
/// how to recognise a good measurement.
#[derive(Clone)]
pub struct AmplificationProblem {
    /// Phase oracle marking the good states.
    pub oracle: Circuit,
    /// Preparation of the initial state. `None` means `H` on every qubit.
    pub state_preparation: Option<Circuit>,
    /// Classical check applied to measured bitstrings.
    pub is_good_state: GoodStatePredicate,
}

impl AmplificationProblem {
    /// A problem over `oracle` with a uniform superposition as its start.
    pub fn new(oracle: Circuit, is_good_state: GoodStatePredicate) -> Self {
        Self {
            oracle,
            state_preparation: None,
            is_good_state,
        }
    }

    /// The problem of finding an assignment that satisfies `oracle`'s
    /// expression. Measurements that fail to parse count as bad states.
    pub fn from_oracle(oracle: &PhaseOracle) -> Self {
        let expression = oracle.expression().clone();
        Self::new(
            oracle.circuit().clone(),
            Arc::new(move |bits: &str| expression.evaluate_bitstring(bits).unwrap_or(false)),
        )
    }

    /// Replace the initial state preparation.
    pub fn with_state_preparation(mut self, state_preparation: Circuit) -> Self {
        self.state_preparation = Some(state_preparation);
        self
    }

    /// Number of qubits the search acts on.
    pub fn num_qubits(&self) -> usize {
        self.oracle.num_qubits()
    }

    /// The state preparation, built as `H` on every oracle qubit when unset.
    pub fn state_preparation(&self) -> SearchResult<Circuit> {
        if let Some(prep) = &self.state_preparation {
            if prep.num_qubits() != self.oracle.num_qubits() {
                return Err(SearchError::Circuit(qsat_ir::IrError::WidthMismatch {
                    expected: self.oracle.num_qubits(),
                    got: prep.num_qubits(),
                }));
            }
            return Ok(prep.clone());
        }
        let mut prep = Circuit::with_layout_of("state_preparation", &self.oracle);
        prep.apply_all(StandardGate::H)?;
        Ok(prep)
    }

    /// Whether `bits` is a good state.
    pub fn is_good(&self, bits: &str) -> bool {
        (self.is_good_state)(bits)
    }
}

impl fmt::Debug for AmplificationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmplificationProblem")
            .field("oracle", &self.oracle.name())
            .field("num_qubits", &self.num_qubits())
            .field("state_preparation", &self.state_preparation.as_ref().map(Circuit::name))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_oracle_predicate() {
        let oracle = PhaseOracle::from_expression("a & ~b").unwrap();
        let problem = AmplificationProblem::from_oracle(&oracle);
        assert_eq!(problem.num_qubits(), 2);
        assert!(problem.is_good("10"));
        assert!(!problem.is_good("11"));
        assert!(!problem.is_good("1"));
    }

    #[test]
    fn test_default_state_preparation() {
        let oracle = PhaseOracle::from_expression("a & b & c").unwrap();
        let problem = AmplificationProblem::from_oracle(&oracle);
        let prep = problem.state_preparation().unwrap();
        assert_eq!(prep.num_qubits(), 3);
        assert_eq!(prep.count_ops().get("h"), Some(&3));
    }

    #[test]
    fn test_state_preparation_width_checked() {
        let oracle = PhaseOracle::from_expression("a & b").unwrap();
        let problem = AmplificationProblem::from_oracle(&oracle)
            .with_state_preparation(Circuit::with_size("prep", 3, 0));
        assert!(matches!(
            problem.state_preparation(),
            Err(SearchError::Circuit(_))
        ));
    }
}
