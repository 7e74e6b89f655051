//! Job lifecycle types.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           │
//!                  │           ├──→ Failed(reason)
//!                  │           │
//!                  └───────────┴──→ Cancelled
//! ```
//!
//! Transitions never go backwards and terminal states are permanent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is currently running.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed with an error message.
    Failed(String),
    /// Job was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: &JobStatus) -> bool {
        match self {
            JobStatus::Queued => !matches!(next, JobStatus::Queued),
            JobStatus::Running => !matches!(next, JobStatus::Queued | JobStatus::Running),
            _ => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A job with timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of shots requested.
    pub shots: u32,
    /// Time the job was created.
    pub created_at: DateTime<Utc>,
    /// Time the job started running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Backend the job was submitted to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl Job {
    /// Create a queued job.
    pub fn new(id: impl Into<JobId>, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            backend: None,
        }
    }

    /// Set the backend name.
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Move to `status`, stamping start and finish times.
    ///
    /// Fails if the state machine forbids the move.
    pub fn transition(&mut self, status: JobStatus) -> HalResult<()> {
        if !self.status.can_transition_to(&status) {
            return Err(HalError::InvalidTransition {
                job: self.id.to_string(),
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        let now = Utc::now();
        if matches!(status, JobStatus::Running) {
            self.started_at = Some(now);
        }
        if status.is_terminal() {
            self.finished_at = Some(now);
        }
        self.status = status;
        Ok(())
    }

    /// Wall time between start and finish, once both are known.
    pub fn run_time(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_job_lifecycle_stamps_times() {
        let mut job = Job::new("job-1", 1024).with_backend("simulator");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.started_at.is_none());

        job.transition(JobStatus::Running).unwrap();
        assert!(job.started_at.is_some());
        assert!(job.run_time().is_none());

        job.transition(JobStatus::Completed).unwrap();
        assert!(job.finished_at.is_some());
        assert!(job.run_time().is_some());
    }

    #[test]
    fn test_terminal_states_are_permanent() {
        let mut job = Job::new("job-2", 1);
        job.transition(JobStatus::Cancelled).unwrap();
        assert!(matches!(
            job.transition(JobStatus::Running),
            Err(HalError::InvalidTransition { .. })
        ));
        assert_eq!(job.status, JobStatus::Cancelled);
    }

    #[test]
    fn test_no_backwards_moves() {
        assert!(!JobStatus::Running.can_transition_to(&JobStatus::Queued));
        assert!(JobStatus::Queued.can_transition_to(&JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(&JobStatus::Failed("x".into())));
    }
}
