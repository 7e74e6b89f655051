//! OpenQASM 3 text output.

use std::fmt::Write as _;

use crate::circuit::Circuit;
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Emit a circuit as OpenQASM 3 source.
///
/// Qubits are declared as one register `q`, classical bits as `c`.
/// Multi-controlled gates use the `ctrl(k) @` modifier, and a non-zero
/// global phase is written as a `gphase` statement.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::default();
    emitter.emit_circuit(circuit);
    emitter.output
}

#[derive(Default)]
struct Emitter {
    output: String,
}

impl Emitter {
    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }
        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] c;"));
        }
        if num_qubits > 0 || num_clbits > 0 {
            self.writeln("");
        }

        if circuit.global_phase() != 0.0 {
            self.writeln(&format!("gphase({});", circuit.global_phase()));
        }
        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        let qubits = emit_qubits(&instruction.qubits);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let head = gate_head(gate);
                self.writeln(&format!("{head} {qubits};"));
            }
            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("{} = measure {};", clbit(*c), qubit(*q)));
                }
            }
            InstructionKind::Barrier => {
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        let _ = writeln!(self.output, "{line}");
    }
}

fn gate_head(gate: &StandardGate) -> String {
    match gate {
        StandardGate::P(theta) => format!("p({theta})"),
        StandardGate::CP(theta) => format!("cp({theta})"),
        StandardGate::MCX { num_controls } => format!("ctrl({num_controls}) @ x"),
        StandardGate::MCZ { num_qubits } => format!("ctrl({}) @ z", num_qubits - 1),
        other => other.name().to_string(),
    }
}

fn qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}
