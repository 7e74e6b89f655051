//! Error types for oracle synthesis and Grover search.

use qsat_hal::HalError;
use qsat_ir::IrError;
use qsat_logic::LogicError;
use thiserror::Error;

/// Errors that can occur while building or running a search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The expression could not be read or enumerated.
    #[error("Expression error: {0}")]
    Logic(#[from] LogicError),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// The backend rejected or failed a job.
    #[error("Backend error: {0}")]
    Backend(#[from] HalError),

    /// There is nothing to search over.
    #[error("Expression has no variables to search over")]
    NoVariables,

    /// The iteration schedule cannot produce a single round.
    #[error("Invalid iteration schedule: {0}")]
    InvalidIterations(String),

    /// A growth schedule that never grows.
    #[error("Growth rate must be greater than 1.0, got {0}")]
    InvalidGrowthRate(f64),

    /// Unrecognised synthesis method name.
    #[error("Unknown synthesis method '{0}' (expected 'anf' or 'minterm')")]
    UnknownSynthesis(String),
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
