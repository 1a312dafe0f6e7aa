//! Notifications emitted by the job controller.
//!
//! These are the transient, user-facing messages (the "toasts"); the
//! durable state lives in [`JobState`](vidlate_core::job::JobState).

use serde::Serialize;
use vidlate_core::job::JobId;

/// A notification about the controller's current job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobEvent {
    /// A submission was rejected locally; no network call was made.
    ValidationFailed { message: String },

    /// The upload started.
    Uploading { file_name: String, target_language: String },

    /// The backend accepted the upload and polling is armed.
    Submitted { job_id: JobId },

    /// A poll came back without a terminal status.
    StillProcessing {
        job_id: JobId,
        /// Raw status value reported by the backend, if any.
        status: Option<String>,
    },

    /// The job finished with a result.
    Completed { job_id: JobId, result: String },

    /// The job ended in error. `job_id` is `None` when the upload failed.
    Failed {
        job_id: Option<JobId>,
        message: String,
    },
}

impl JobEvent {
    /// Whether this event ends the current job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}
