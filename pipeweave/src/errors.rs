//! Error types for the PipeWeave client.
//!
//! Both job transports (polling and streaming) converge on the same
//! taxonomy so callers can treat them interchangeably.

use thiserror::Error;

use crate::job::JobStatus;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, PipeweaveError>;

/// The main error type for PipeWeave client operations.
#[derive(Debug, Error)]
pub enum PipeweaveError {
    /// Transport or HTTP-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The backend reported the job as failed or cancelled.
    #[error("job {status}: {message}")]
    JobFailed {
        /// The terminal status observed (failed or cancelled).
        status: JobStatus,
        /// Server-supplied message, or a default when absent.
        message: String,
    },

    /// Poll attempts were exhausted before a terminal state.
    #[error("job did not reach a terminal state within {attempts} attempts")]
    JobTimeout {
        /// Number of fetch attempts made.
        attempts: usize,
    },

    /// A streamed event or response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Client-side input was rejected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backend returned 401; the stored token has been cleared.
    #[error("unauthorized: bearer token rejected")]
    Unauthorized,

    /// The key-value store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// A wizard step transition was not permitted.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The operation was cancelled by the caller.
    #[error("cancelled by caller")]
    Cancelled,
}

impl PipeweaveError {
    /// Creates a job-failed error with a default message when none is given.
    #[must_use]
    pub fn job_failed(status: JobStatus, message: Option<String>) -> Self {
        Self::JobFailed {
            status,
            message: message
                .unwrap_or_else(|| format!("job ended with status '{status}'")),
        }
    }

    /// Returns true when the error originated from the backend reporting a
    /// terminal failure (as opposed to a client-side condition).
    #[must_use]
    pub fn is_job_failure(&self) -> bool {
        matches!(self, Self::JobFailed { .. })
    }
}

impl From<reqwest::Error> for PipeweaveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PipeweaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
