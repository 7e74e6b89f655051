//! High-level circuit builder API.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates and operations.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Create an empty circuit whose qubits take the same ids and labels as
    /// `template`, without any classical bits or operations.
    pub fn with_layout_of(name: impl Into<String>, template: &Circuit) -> Self {
        let mut circuit = Self::new(name);
        for qubit in &template.qubits {
            circuit.dag.add_qubit(qubit.id);
            circuit.qubits.push(qubit.clone());
        }
        circuit.next_qubit_id = template.next_qubit_id;
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::new(id));
        self.dag.add_qubit(id);
        id
    }

    /// Add a single qubit labelled as the only member of a named register.
    pub fn add_named_qubit(&mut self, name: impl Into<String>) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::with_register(id, name, 0));
        self.dag.add_qubit(id);
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            self.qubits.push(Qubit::with_register(id, &name, i));
            self.dag.add_qubit(id);
            ids.push(id);
        }
        ids
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.clbits.push(Clbit::new(id));
        self.dag.add_clbit(id);
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = ClbitId(self.next_clbit_id);
            self.next_clbit_id += 1;
            self.clbits.push(Clbit::with_register(id, &name, i));
            self.dag.add_clbit(id);
            ids.push(id);
        }
        ids
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(theta), qubit)
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::single_qubit_gate(gate, qubit))?;
        Ok(self)
    }

    /// Apply a single-qubit gate to every qubit, in id order.
    pub fn apply_all(&mut self, gate: StandardGate) -> IrResult<&mut Self> {
        let ids: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        for id in ids {
            self.single(gate.clone(), id)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CZ,
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    // =========================================================================
    // Three-qubit and multi-controlled gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply doubly-controlled Z gate.
    pub fn ccz(&mut self, q1: QubitId, q2: QubitId, q3: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCZ, [q1, q2, q3]))?;
        Ok(self)
    }

    /// Apply X to `target` controlled on every qubit in `controls`.
    ///
    /// Picks X, CX or CCX for up to two controls.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        match controls {
            [] => self.x(target),
            [c] => self.cx(*c, target),
            [c1, c2] => self.ccx(*c1, *c2, target),
            _ => {
                #[allow(clippy::cast_possible_truncation)]
                let gate = StandardGate::MCX {
                    num_controls: controls.len() as u32,
                };
                let operands = controls.iter().copied().chain(std::iter::once(target));
                self.dag.apply(Instruction::gate(gate, operands))?;
                Ok(self)
            }
        }
    }

    /// Flip the phase of the state where every qubit in `qubits` is |1⟩.
    ///
    /// Picks Z, CZ or CCZ for up to three qubits. An empty list is a no-op.
    pub fn mcz(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        match qubits {
            [] => Ok(self),
            [q] => self.z(*q),
            [a, b] => self.cz(*a, *b),
            [a, b, c] => self.ccz(*a, *b, *c),
            _ => {
                #[allow(clippy::cast_possible_truncation)]
                let gate = StandardGate::MCZ {
                    num_qubits: qubits.len() as u32,
                };
                self.dag
                    .apply(Instruction::gate(gate, qubits.iter().copied()))?;
                Ok(self)
            }
        }
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Append a raw instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self
            .clbits
            .iter()
            .map(|c| c.id)
            .take(qubits.len())
            .collect();

        self.dag.apply(Instruction::measure_all(qubits, clbits)?)?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Append every operation of `other`, mapping its qubit `i` onto
    /// `qubit_map[i]`. The global phases add up.
    ///
    /// `other` must not contain measurements.
    pub fn compose(&mut self, other: &Circuit, qubit_map: &[QubitId]) -> IrResult<&mut Self> {
        if qubit_map.len() != other.num_qubits() {
            return Err(IrError::WidthMismatch {
                expected: other.num_qubits(),
                got: qubit_map.len(),
            });
        }
        let mapping: FxHashMap<QubitId, QubitId> = other
            .qubits
            .iter()
            .map(|q| q.id)
            .zip(qubit_map.iter().copied())
            .collect();

        for (_, inst) in other.dag.topological_ops() {
            if inst.is_measure() {
                return Err(IrError::InvalidDag(
                    "cannot compose a circuit containing measurements".into(),
                ));
            }
            let mut mapped = inst.clone();
            mapped.qubits = inst.qubits.iter().map(|q| mapping[q]).collect();
            self.dag.apply(mapped)?;
        }
        let phase = self.dag.global_phase() + other.dag.global_phase();
        self.dag.set_global_phase(phase);
        Ok(self)
    }

    /// Append `other` onto the qubits with the same ids.
    pub fn extend(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        let ids: Vec<_> = other.qubits.iter().map(|q| q.id).collect();
        self.compose(other, &ids)
    }

    /// The inverse circuit: reversed order, every gate inverted, negated
    /// global phase. Fails if the circuit measures.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverse = Circuit::with_layout_of(format!("{}_dg", self.name), self);
        let ops: Vec<&Instruction> = self.dag.topological_ops().map(|(_, i)| i).collect();
        for inst in ops.into_iter().rev() {
            inverse.dag.apply(inst.inverse()?)?;
        }
        inverse.dag.set_global_phase(-self.dag.global_phase());
        Ok(inverse)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get the number of operations.
    pub fn size(&self) -> usize {
        self.dag.num_ops()
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        self.dag.count_ops()
    }

    /// Get the global phase.
    pub fn global_phase(&self) -> f64 {
        self.dag.global_phase()
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.dag.set_global_phase(phase);
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions().any(Instruction::is_measure)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "circuit {} ({} qubits, {} clbits, depth {})",
            self.name,
            self.num_qubits(),
            self.num_clbits(),
            self.depth()
        )?;
        let labels: FxHashMap<QubitId, String> = self
            .qubits
            .iter()
            .map(|q| (q.id, q.to_string()))
            .collect();
        for inst in self.instructions() {
            let operands: Vec<String> = inst
                .qubits
                .iter()
                .map(|q| labels.get(q).cloned().unwrap_or_else(|| q.to_string()))
                .collect();
            match inst.as_gate() {
                Some(gate) => writeln!(f, "  {gate} {}", operands.join(", "))?,
                None if inst.is_measure() => {
                    let targets: Vec<String> =
                        inst.clbits.iter().map(ToString::to_string).collect();
                    writeln!(
                        f,
                        "  measure {} -> {}",
                        operands.join(", "),
                        targets.join(", ")
                    )?;
                }
                None => writeln!(f, "  {} {}", inst.name(), operands.join(", "))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let qreg = circuit.add_qreg("q", 4);
        let creg = circuit.add_creg("c", 4);

        assert_eq!(qreg.len(), 4);
        assert_eq!(creg.len(), 4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 4);
    }

    #[test]
    fn test_mcz_picks_gate_by_width() {
        let mut circuit = Circuit::with_size("test", 5, 0);
        let q: Vec<_> = (0..5).map(QubitId).collect();
        circuit.mcz(&q[..1]).unwrap();
        circuit.mcz(&q[..2]).unwrap();
        circuit.mcz(&q[..3]).unwrap();
        circuit.mcz(&q).unwrap();
        circuit.mcz(&[]).unwrap();

        let names: Vec<_> = circuit.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["z", "cz", "ccz", "mcz"]);
    }

    #[test]
    fn test_mcx_picks_gate_by_width() {
        let mut circuit = Circuit::with_size("test", 5, 0);
        circuit.mcx(&[QubitId(0)], QubitId(4)).unwrap();
        circuit
            .mcx(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(4))
            .unwrap();
        let names: Vec<_> = circuit.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "mcx"]);
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_inverse_reverses_and_inverts() {
        let mut circuit = Circuit::with_size("prep", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(1))
            .unwrap()
            .cp(PI / 4.0, QubitId(0), QubitId(1))
            .unwrap();
        circuit.set_global_phase(0.5);

        let inverse = circuit.inverse().unwrap();
        let gates: Vec<_> = inverse.instructions().filter_map(Instruction::as_gate).collect();
        assert_eq!(
            gates,
            vec![
                &StandardGate::CP(-PI / 4.0),
                &StandardGate::Tdg,
                &StandardGate::H
            ]
        );
        assert!((inverse.global_phase() + 0.5).abs() < 1e-12);

        let round_trip = inverse.inverse().unwrap();
        let original: Vec<_> = circuit.instructions().collect();
        let again: Vec<_> = round_trip.instructions().collect();
        assert_eq!(original, again);
    }

    #[test]
    fn test_inverse_rejects_measurement() {
        let mut circuit = Circuit::with_size("m", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(circuit.inverse(), Err(IrError::NotInvertible(_))));
    }

    #[test]
    fn test_compose_with_mapping() {
        let mut inner = Circuit::with_size("inner", 2, 0);
        inner.cx(QubitId(0), QubitId(1)).unwrap();
        inner.set_global_phase(PI);

        let mut outer = Circuit::with_size("outer", 3, 0);
        outer.compose(&inner, &[QubitId(2), QubitId(0)]).unwrap();

        let inst: Vec<_> = outer.instructions().collect();
        assert_eq!(inst.len(), 1);
        assert_eq!(inst[0].qubits, vec![QubitId(2), QubitId(0)]);
        assert!((outer.global_phase() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_compose_width_mismatch() {
        let inner = Circuit::with_size("inner", 2, 0);
        let mut outer = Circuit::with_size("outer", 3, 0);
        let result = outer.compose(&inner, &[QubitId(0)]);
        assert!(matches!(
            result,
            Err(IrError::WidthMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_named_qubits_in_display() {
        let mut circuit = Circuit::new("oracle");
        let a = circuit.add_named_qubit("alice");
        let b = circuit.add_named_qubit("bob");
        circuit.cz(a, b).unwrap();
        let text = circuit.to_string();
        assert!(text.contains("cz alice[0], bob[0]"));
    }

    #[test]
    fn test_with_layout_of_copies_labels() {
        let mut template = Circuit::new("t");
        template.add_named_qubit("x1");
        template.add_named_qubit("x2");
        let copy = Circuit::with_layout_of("copy", &template);
        assert_eq!(copy.qubits(), template.qubits());
        assert_eq!(copy.size(), 0);
    }
}
