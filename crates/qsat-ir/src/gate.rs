//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// The set is what phase oracles and Grover operators need: Paulis, the
/// Clifford+T single-qubit gates, phases, and the controlled families up to
/// arbitrary control count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    /// Phase gate diag(1, e^{iθ}).
    P(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Controlled phase gate.
    CP(f64),
    /// SWAP gate.
    Swap,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Doubly-controlled Z gate.
    CCZ,

    // Multi-controlled gates
    /// X on the last operand, controlled on all preceding operands.
    MCX {
        /// Number of control qubits.
        num_controls: u32,
    },
    /// Phase flip of the all-ones state of its operands. Symmetric in its qubits.
    MCZ {
        /// Total number of qubits the gate acts on.
        num_qubits: u32,
    },
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
            StandardGate::CCZ => "ccz",
            StandardGate::MCX { .. } => "mcx",
            StandardGate::MCZ { .. } => "mcz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::P(_) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::CP(_) | StandardGate::Swap => 2,

            StandardGate::CCX | StandardGate::CCZ => 3,

            StandardGate::MCX { num_controls } => num_controls + 1,
            StandardGate::MCZ { num_qubits } => *num_qubits,
        }
    }

    /// Whether applying the gate twice yields the identity.
    pub fn is_self_inverse(&self) -> bool {
        !matches!(
            self,
            StandardGate::S
                | StandardGate::Sdg
                | StandardGate::T
                | StandardGate::Tdg
                | StandardGate::P(_)
                | StandardGate::CP(_)
        )
    }

    /// Whether the gate is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::Z
                | StandardGate::S
                | StandardGate::Sdg
                | StandardGate::T
                | StandardGate::Tdg
                | StandardGate::P(_)
                | StandardGate::CZ
                | StandardGate::CP(_)
                | StandardGate::CCZ
                | StandardGate::MCZ { .. }
        )
    }

    /// The inverse gate.
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::P(theta) => StandardGate::P(-theta),
            StandardGate::CP(theta) => StandardGate::CP(-theta),
            other => other.clone(),
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardGate::P(theta) | StandardGate::CP(theta) => {
                write!(f, "{}({theta:.6})", self.name())
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CZ.num_qubits(), 2);
        assert_eq!(StandardGate::CCZ.num_qubits(), 3);
        assert_eq!(StandardGate::MCX { num_controls: 4 }.num_qubits(), 5);
        assert_eq!(StandardGate::MCZ { num_qubits: 6 }.num_qubits(), 6);
    }

    #[test]
    fn test_inverse() {
        assert_eq!(StandardGate::S.inverse(), StandardGate::Sdg);
        assert_eq!(StandardGate::Tdg.inverse(), StandardGate::T);
        assert_eq!(StandardGate::P(PI / 3.0).inverse(), StandardGate::P(-PI / 3.0));
        assert_eq!(StandardGate::CCX.inverse(), StandardGate::CCX);
    }

    #[test]
    fn test_self_inverse_and_diagonal() {
        assert!(StandardGate::H.is_self_inverse());
        assert!(StandardGate::MCZ { num_qubits: 4 }.is_self_inverse());
        assert!(!StandardGate::T.is_self_inverse());

        assert!(StandardGate::CCZ.is_diagonal());
        assert!(!StandardGate::H.is_diagonal());
    }

    #[test]
    fn test_display() {
        assert_eq!(StandardGate::MCX { num_controls: 3 }.to_string(), "mcx");
        assert_eq!(StandardGate::P(0.5).to_string(), "p(0.500000)");
    }
}
