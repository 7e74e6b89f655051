//! Peephole cancellation of adjacent self-inverse gates.

use rustc_hash::FxHashMap;

use crate::circuit::Circuit;
use crate::error::IrResult;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Remove pairs of adjacent self-inverse gates that act on the same qubits.
///
/// Two gates are adjacent when no other operation touches any of their
/// qubits in between. Removing a pair can expose another pair underneath
/// (`x h h x` collapses completely); the per-wire stacks make this reach a
/// fixpoint in a single sweep.
pub fn cancel_adjacent_inverses(circuit: &Circuit) -> IrResult<Circuit> {
    let mut kept: Vec<Option<Instruction>> = Vec::with_capacity(circuit.size());
    let mut wires: FxHashMap<QubitId, Vec<usize>> = FxHashMap::default();

    for inst in circuit.instructions() {
        if let Some(prev) = cancellable_predecessor(inst, &kept, &wires) {
            kept[prev] = None;
            for q in &inst.qubits {
                if let Some(stack) = wires.get_mut(q) {
                    stack.pop();
                }
            }
            continue;
        }
        let idx = kept.len();
        kept.push(Some(inst.clone()));
        for q in &inst.qubits {
            wires.entry(*q).or_default().push(idx);
        }
    }

    let mut out = Circuit::with_layout_of(circuit.name(), circuit);
    for _ in circuit.clbits() {
        out.add_clbit();
    }
    out.set_global_phase(circuit.global_phase());
    for inst in kept.into_iter().flatten() {
        out.append(inst)?;
    }
    Ok(out)
}

/// Index of the kept instruction that `inst` would cancel against, if it is
/// the latest operation on every one of `inst`'s wires.
fn cancellable_predecessor(
    inst: &Instruction,
    kept: &[Option<Instruction>],
    wires: &FxHashMap<QubitId, Vec<usize>>,
) -> Option<usize> {
    if !inst.is_gate() || inst.qubits.is_empty() {
        return None;
    }
    let mut tops = inst
        .qubits
        .iter()
        .map(|q| wires.get(q).and_then(|stack| stack.last().copied()));
    let first = tops.next()??;
    if !tops.all(|top| top == Some(first)) {
        return None;
    }
    let prev = kept[first].as_ref()?;
    (prev.qubits.len() == inst.qubits.len() && prev.cancels_with(inst)).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn names(circuit: &Circuit) -> Vec<String> {
        circuit
            .instructions()
            .map(|i| i.name().to_string())
            .collect()
    }

    #[test]
    fn test_removes_simple_pair() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
        c.h(QubitId(1)).unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(names(&out), vec!["h"]);
    }

    #[test]
    fn test_nested_pairs_collapse() {
        let mut c = Circuit::with_size("c", 1, 0);
        c.x(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(out.size(), 0);
    }

    #[test]
    fn test_blocked_by_intervening_gate() {
        let mut c = Circuit::with_size("c", 2, 0);
        c.x(QubitId(0)).unwrap();
        c.cz(QubitId(0), QubitId(1)).unwrap();
        c.x(QubitId(0)).unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(names(&out), vec!["x", "cz", "x"]);
    }

    #[test]
    fn test_x_conjugated_mczs_share_layers() {
        // Two minterms 110 and 100 on three qubits: the X on q2 between the
        // two MCZs cancels, the X on q1 does not.
        let q: Vec<_> = (0..3).map(QubitId).collect();
        let mut c = Circuit::with_size("c", 3, 0);
        c.x(q[2]).unwrap();
        c.ccz(q[0], q[1], q[2]).unwrap();
        c.x(q[2]).unwrap();
        c.x(q[1]).unwrap().x(q[2]).unwrap();
        c.ccz(q[0], q[1], q[2]).unwrap();
        c.x(q[1]).unwrap().x(q[2]).unwrap();

        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(out.count_ops().get("x"), Some(&4));
        assert_eq!(out.count_ops().get("ccz"), Some(&2));
    }

    #[test]
    fn test_non_self_inverse_kept() {
        let mut c = Circuit::with_size("c", 1, 0);
        c.t(QubitId(0)).unwrap().t(QubitId(0)).unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(out.size(), 2);
    }

    #[test]
    fn test_symmetric_mcz_operands() {
        let q: Vec<_> = (0..4).map(QubitId).collect();
        let mut c = Circuit::with_size("c", 4, 0);
        c.append(Instruction::gate(StandardGate::MCZ { num_qubits: 4 }, q.clone()))
            .unwrap();
        c.append(Instruction::gate(
            StandardGate::MCZ { num_qubits: 4 },
            q.iter().rev().copied(),
        ))
        .unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(out.size(), 0);
    }

    #[test]
    fn test_keeps_phase_and_measurements() {
        let mut c = Circuit::with_size("c", 1, 1);
        c.set_global_phase(1.0);
        c.x(QubitId(0)).unwrap();
        c.measure(QubitId(0), crate::qubit::ClbitId(0)).unwrap();
        let out = cancel_adjacent_inverses(&c).unwrap();
        assert_eq!(out.num_clbits(), 1);
        assert_eq!(names(&out), vec!["x", "measure"]);
        assert!((out.global_phase() - 1.0).abs() < 1e-12);
    }
}
