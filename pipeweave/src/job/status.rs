//! Job status enum and snapshot model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle status of an asynchronous backend job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting in the server-side queue.
    Queued,
    /// Job is executing.
    Running,
    /// Job finished successfully.
    Completed,
    /// Job ended with an error.
    Failed,
    /// Job was cancelled server-side.
    Cancelled,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Queued
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl JobStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the status indicates a terminal failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// One status snapshot of an asynchronous backend job.
///
/// Snapshots are replaced wholesale from each server response; they are
/// never merged. Once a terminal status is observed no further snapshot
/// is produced for that job.
///
/// Field aliases absorb the wire variants the backend uses: the EDA
/// status endpoint reports `progress_pct`/`step` while training status
/// and SSE frames report `progress_percentage`/`current_step`/`error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Backend-assigned job identifier. Empty when the endpoint omits it
    /// (the caller already knows which job it asked about).
    #[serde(default)]
    pub job_id: String,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Progress in percent. The server does not enforce monotonicity, so
    /// regressions are tolerated; values are only clamped via [`Self::progress`].
    #[serde(default, alias = "progress_pct")]
    pub progress_percentage: Option<f64>,
    /// Human-readable current-phase label.
    #[serde(default, alias = "current_step")]
    pub step: Option<String>,
    /// Error details, present when status is failed.
    #[serde(default, alias = "error")]
    pub error_message: Option<String>,
}

impl JobSnapshot {
    /// Creates a snapshot with just an id and status.
    #[must_use]
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            progress_percentage: None,
            step: None,
            error_message: None,
        }
    }

    /// Sets the progress percentage.
    #[must_use]
    pub fn with_progress(mut self, pct: f64) -> Self {
        self.progress_percentage = Some(pct);
        self
    }

    /// Sets the current-phase label.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Sets the error message.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Progress clamped to 0-100, defaulting to 0 when absent.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress_percentage.unwrap_or(0.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Queued.to_string(), "queued");
        assert_eq!(JobStatus::Completed.to_string(), "completed");
        assert_eq!(JobStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_status_is_failure() {
        assert!(JobStatus::Failed.is_failure());
        assert!(JobStatus::Cancelled.is_failure());
        assert!(!JobStatus::Completed.is_failure());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&JobStatus::Running).unwrap();
        assert_eq!(json, r#""running""#);
        let back: JobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, JobStatus::Running);
    }

    #[test]
    fn test_snapshot_decodes_training_wire_shape() {
        let snap: JobSnapshot = serde_json::from_str(
            r#"{
                "job_id": "j-1",
                "status": "running",
                "progress_percentage": 42.5,
                "current_step": "fitting estimator",
                "error": null
            }"#,
        )
        .unwrap();
        assert_eq!(snap.job_id, "j-1");
        assert_eq!(snap.status, JobStatus::Running);
        assert_eq!(snap.progress(), 42.5);
        assert_eq!(snap.step.as_deref(), Some("fitting estimator"));
    }

    #[test]
    fn test_snapshot_decodes_eda_wire_shape() {
        // EDA status responses omit job_id and report progress_pct as an int.
        let snap: JobSnapshot = serde_json::from_str(
            r#"{"status": "queued", "progress_pct": 0, "step": null}"#,
        )
        .unwrap();
        assert_eq!(snap.job_id, "");
        assert_eq!(snap.status, JobStatus::Queued);
        assert_eq!(snap.progress(), 0.0);
    }

    #[test]
    fn test_progress_clamped_but_regression_tolerated() {
        let snap = JobSnapshot::new("j", JobStatus::Running).with_progress(120.0);
        assert_eq!(snap.progress(), 100.0);
        let snap = JobSnapshot::new("j", JobStatus::Running).with_progress(-3.0);
        assert_eq!(snap.progress(), 0.0);
        // A lower value than previously observed is stored as-is.
        let snap = snap.with_progress(10.0);
        assert_eq!(snap.progress(), 10.0);
    }
}
