//! Backend status vocabulary and the snapshot wire type.
//!
//! The backend reports job progress as a free-form `status` string. This
//! module turns a raw [`StatusSnapshot`] into a [`JobStatus`] so callers can
//! match exhaustively instead of comparing strings.

use serde::{Deserialize, Serialize};

/// Status value the backend uses for a finished job.
pub const STATUS_COMPLETED: &str = "completed";

/// Status value the backend uses for a failed job.
pub const STATUS_ERROR: &str = "error";

/// Status values the backend uses while a job is still running.
pub const IN_PROGRESS_STATUSES: [&str; 3] = ["pending", "queued", "processing"];

/// One status lookup as returned by the backend (and relayed unchanged by
/// the proxy API).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Interpret the raw snapshot.
    pub fn classify(&self) -> JobStatus {
        match self.status.as_deref() {
            Some(STATUS_COMPLETED) => match self.result.as_deref() {
                Some(result) if !result.is_empty() => JobStatus::Completed {
                    result: result.to_string(),
                },
                _ => JobStatus::AwaitingResult,
            },
            Some(STATUS_ERROR) => JobStatus::Failed {
                error: self.error.clone(),
            },
            Some(status) if IN_PROGRESS_STATUSES.contains(&status) => JobStatus::InProgress {
                status: status.to_string(),
            },
            other => JobStatus::Unrecognized {
                status: other.map(str::to_string),
            },
        }
    }
}

/// Typed interpretation of a [`StatusSnapshot`].
///
/// Only [`Completed`](Self::Completed) and [`Failed`](Self::Failed) are
/// terminal. Everything else means "keep polling".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Finished with a non-empty result payload.
    Completed { result: String },
    /// The backend reported the job as failed, with an optional message.
    Failed { error: Option<String> },
    /// A known in-progress value.
    InProgress { status: String },
    /// Completion was reported but no result payload came with it.
    AwaitingResult,
    /// Missing or unknown status value (e.g. `not_found`).
    Unrecognized { status: Option<String> },
}
