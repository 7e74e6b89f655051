//! qsat Hardware Abstraction Layer
//!
//! The seam between search algorithms and whatever runs their circuits:
//! - the [`Backend`] trait for job submission and management
//! - [`Capabilities`] describing what a backend accepts
//! - [`Counts`] and [`ExecutionResult`] for measurement outcomes
//! - [`Histogram`] for looking at them
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use qsat_hal::{
//!     Backend, BackendAvailability, Capabilities, ExecutionResult, HalResult, JobId,
//!     JobStatus, ValidationResult,
//! };
//! use qsat_ir::Circuit;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     async fn availability(&self) -> HalResult<BackendAvailability> {
//!         Ok(BackendAvailability::always_available())
//!     }
//!
//!     async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!
//!     async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
//!         # todo!()
//!     }
//!
//!     async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
//!         # todo!()
//!     }
//!
//!     async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//!
//!     async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod histogram;
pub mod job;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, MAX_POLLS, POLL_INTERVAL,
    ValidationResult,
};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use histogram::{Histogram, HistogramOrder, HistogramRow};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
