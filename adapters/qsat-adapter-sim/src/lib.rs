//! qsat Local Statevector Simulator
//!
//! The backend qsat runs Grover searches on. It keeps the full statevector,
//! so results are exact up to sampling noise and width is bounded by memory.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 16 | ~1 MB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```rust
//! use qsat_adapter_sim::SimulatorBackend;
//! use qsat_hal::Backend;
//! use qsat_ir::{Circuit, QubitId};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let backend = SimulatorBackend::new().with_seed(7);
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let result = backend.run(&circuit, 1000).await.unwrap();
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! # });
//! ```

mod simulator;
pub mod statevector;

pub use simulator::{
    DEFAULT_MAX_QUBITS, DEFAULT_MAX_SHOTS, MAX_SUPPORTED_QUBITS, SimulatorBackend,
};
pub use statevector::Statevector;
