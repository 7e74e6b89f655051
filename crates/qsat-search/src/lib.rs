//! Grover search over Boolean expressions.
//!
//! Turns a [`BoolExpr`](qsat_logic::BoolExpr) into a phase oracle, wraps it
//! in an [`AmplificationProblem`] and runs [`Grover`] rounds against any
//! [`Backend`](qsat_hal::Backend) until a measured bitstring satisfies the
//! expression.
//!
//! # Example
//!
//! ```rust
//! use qsat_search::{AmplificationProblem, Grover, PhaseOracle};
//! use qsat_adapter_sim::SimulatorBackend;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let oracle = PhaseOracle::from_expression("a & ~b & c").unwrap();
//! let problem = AmplificationProblem::from_oracle(&oracle);
//!
//! let backend = SimulatorBackend::new().with_seed(1);
//! let result = Grover::default()
//!     .with_optimal(1)
//!     .with_seed(1)
//!     .amplify(&backend, &problem)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.iterations, vec![2]);
//! assert_eq!(result.solution(), Some("101"));
//! # });
//! ```
//!
//! # Synthesis
//!
//! | Method | Gates | Notes |
//! |--------|-------|-------|
//! | [`Synthesis::Anf`] | one MCZ per ANF monomial | default; constant term becomes a global phase |
//! | [`Synthesis::Minterm`] | X-conjugated MCZ per solution | adjacent X pairs cancelled |

pub mod error;
pub mod grover;
pub mod operator;
pub mod oracle;
pub mod problem;
pub mod result;

pub use error::{SearchError, SearchResult};
pub use grover::{
    DEFAULT_GROWTH_RATE, DEFAULT_SHOTS, Grover, GroverOptions, IterationSchedule,
    optimal_num_iterations, success_probability,
};
pub use operator::{construct_circuit, grover_operator};
pub use oracle::{PhaseOracle, Synthesis};
pub use problem::{AmplificationProblem, GoodStatePredicate};
pub use result::GroverResult;
