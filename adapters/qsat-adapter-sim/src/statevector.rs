//! Statevector simulation engine.
//!
//! Amplitude index bit `q` is qubit `q`. Controlled gates are applied through
//! masks: an amplitude takes part when every control bit of its index is set.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;

use qsat_ir::{Instruction, InstructionKind, StandardGate};

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    /// Apply an instruction. Measurements and barriers leave the state alone;
    /// outcomes are drawn afterwards with [`Statevector::sample`].
    pub fn apply(&mut self, instruction: &Instruction) {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
            self.apply_gate(gate, &qubits);
        }
    }

    /// Multiply every amplitude by `e^{iθ}`.
    #[allow(clippy::float_cmp)]
    pub fn apply_global_phase(&mut self, theta: f64) {
        if theta == 0.0 {
            return;
        }
        let phase = Complex64::from_polar(1.0, theta);
        for amp in &mut self.amplitudes {
            *amp *= phase;
        }
    }

    fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::I => {}
            StandardGate::X | StandardGate::CX | StandardGate::CCX | StandardGate::MCX { .. } => {
                if let Some((target, controls)) = qubits.split_last() {
                    self.apply_controlled_x(mask_of(controls), *target);
                }
            }
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::Z | StandardGate::CZ | StandardGate::CCZ | StandardGate::MCZ { .. } => {
                self.apply_phase_on_mask(mask_of(qubits), PI);
            }
            StandardGate::S => self.apply_phase_on_mask(mask_of(qubits), PI / 2.0),
            StandardGate::Sdg => self.apply_phase_on_mask(mask_of(qubits), -PI / 2.0),
            StandardGate::T => self.apply_phase_on_mask(mask_of(qubits), PI / 4.0),
            StandardGate::Tdg => self.apply_phase_on_mask(mask_of(qubits), -PI / 4.0),
            StandardGate::P(theta) | StandardGate::CP(theta) => {
                self.apply_phase_on_mask(mask_of(qubits), *theta);
            }
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    /// Flip `target` on every basis state whose `controls` bits are all set.
    fn apply_controlled_x(&mut self, controls: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & controls == controls && i & tgt_mask == 0 {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    /// Multiply by `e^{iθ}` every basis state whose `mask` bits are all set.
    /// Covers Z, S, T, P and their controlled forms.
    #[allow(clippy::float_cmp)]
    fn apply_phase_on_mask(&mut self, mask: usize, theta: f64) {
        let phase = if theta == PI {
            Complex64::new(-1.0, 0.0)
        } else {
            Complex64::from_polar(1.0, theta)
        };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let m1 = 1 << q1;
        let m2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                self.amplitudes.swap(i, (i & !m1) | m2);
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of probabilities; 1 for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Sample one basis state.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        self.sampler().draw(rng)
    }

    /// Sample `shots` basis states, returning how often each index came up.
    pub fn sample_counts<R: Rng>(&self, rng: &mut R, shots: u32) -> FxHashMap<usize, u64> {
        let sampler = self.sampler();
        let mut counts = FxHashMap::default();
        for _ in 0..shots {
            *counts.entry(sampler.draw(rng)).or_insert(0) += 1;
        }
        counts
    }

    fn sampler(&self) -> Sampler {
        let mut total = 0.0;
        let cumulative = self
            .amplitudes
            .iter()
            .map(|a| {
                total += a.norm_sqr();
                total
            })
            .collect();
        Sampler { cumulative, total }
    }

    /// Bitstring of a basis state, qubit 0 leftmost.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        (0..self.num_qubits)
            .map(|q| if (outcome >> q) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// Cumulative distribution for repeated draws.
struct Sampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl Sampler {
    fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= r);
        if idx < self.cumulative.len() {
            return idx;
        }
        // Rounding left r at the very top: take the last state with weight.
        self.cumulative.partition_point(|&c| c < self.total)
    }
}

fn mask_of(qubits: &[usize]) -> usize {
    qubits.iter().fold(0, |m, q| m | (1 << q))
}
