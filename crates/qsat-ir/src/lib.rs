//! qsat Circuit Intermediate Representation
//!
//! The data structures every other qsat crate builds on: qubit and bit
//! identifiers, the gate set used by phase oracles and Grover operators,
//! instructions, a DAG for program order and depth, and the high-level
//! [`Circuit`] builder.
//!
//! # Example: A two-qubit phase oracle
//!
//! ```rust
//! use qsat_ir::{Circuit, QubitId};
//!
//! // Marks |11⟩ with a phase of -1.
//! let mut oracle = Circuit::with_size("and", 2, 0);
//! oracle.cz(QubitId(0), QubitId(1)).unwrap();
//!
//! let inverse = oracle.inverse().unwrap();
//! assert_eq!(inverse.size(), 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase fractions of Z |
//! | `P(θ)` | 1 | Phase gate |
//! | `CX`, `CZ`, `CP(θ)` | 2 | Controlled gates |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CCZ` | 3 | Doubly-controlled gates |
//! | `MCX`, `MCZ` | n | Multi-controlled X and Z |

pub mod cancel;
pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qasm;
pub mod qubit;

pub use cancel::cancel_adjacent_inverses;
pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
