//! Backend capability introspection.

use serde::{Deserialize, Serialize};

use qsat_ir::StandardGate;

/// What a backend can run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Capability flags such as `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a statevector simulator with `num_qubits` qubits.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
            gate_set: GateSet::all_standard(),
            features: vec!["statevector".into(), "multi_controlled".into()],
        }
    }

    /// Set the backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the shot limit.
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Whether the backend advertises a feature flag.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate names a backend accepts, in QASM spelling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    /// Accepted gate names.
    pub gates: Vec<String>,
}

impl GateSet {
    /// Every gate of the circuit IR, including multi-controlled gates.
    pub fn all_standard() -> Self {
        let gates = [
            "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "p", "cx", "cz", "cp", "swap",
            "ccx", "ccz", "mcx", "mcz",
        ];
        Self {
            gates: gates.iter().map(ToString::to_string).collect(),
        }
    }

    /// Whether a gate name is accepted.
    pub fn contains(&self, name: &str) -> bool {
        self.gates.iter().any(|g| g == name)
    }

    /// Whether a gate is accepted.
    pub fn supports(&self, gate: &StandardGate) -> bool {
        self.contains(gate.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(12).with_name("statevector");
        assert_eq!(caps.name, "statevector");
        assert_eq!(caps.num_qubits, 12);
        assert!(caps.is_simulator);
        assert!(caps.has_feature("statevector"));
        assert!(caps.gate_set.supports(&StandardGate::MCZ { num_qubits: 5 }));
        assert!(caps.gate_set.supports(&StandardGate::P(0.25)));
    }

    #[test]
    fn test_restricted_gate_set() {
        let set = GateSet {
            gates: vec!["h".into(), "cz".into()],
        };
        assert!(set.supports(&StandardGate::H));
        assert!(!set.supports(&StandardGate::CCZ));
    }
}
