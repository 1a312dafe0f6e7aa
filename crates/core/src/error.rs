/// Fallback message used when the backend reports a job error without detail.
pub const PROCESSING_FAILED_MESSAGE: &str = "Processing failed";

/// Message surfaced when a submission is attempted without a file.
pub const MISSING_FILE_MESSAGE: &str = "Please select a file";

/// Failures a job can run into, from local validation to backend-reported errors.
///
/// Every variant renders as a single human-readable message. None of them
/// are retried: any failure other than [`Superseded`](Self::Superseded) and
/// [`Closed`](Self::Closed) ends the current job in the `Error` state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// Missing file or unsupported language, caught before any network call.
    #[error("{0}")]
    Validation(String),

    /// The submission call failed (transport failure or non-2xx status).
    #[error("{0}")]
    UploadFailed(String),

    /// The submission succeeded but the response carried no `job_id`.
    #[error("No job ID received from server")]
    MissingJobIdentifier,

    /// A status poll failed (transport failure, non-2xx status or bad body).
    #[error("{0}")]
    StatusCheckFailed(String),

    /// The backend explicitly reported the job as failed.
    #[error("{0}")]
    JobReported(String),

    /// The submission was overtaken by a newer submission or a teardown
    /// before its outcome could be applied.
    #[error("Submission was superseded before it completed")]
    Superseded,

    /// The controller has been shut down and accepts no further work.
    #[error("Job controller has been shut down")]
    Closed,
}

impl JobError {
    /// Build a [`JobError::JobReported`] from the backend's optional message.
    pub fn reported(message: Option<&str>) -> Self {
        match message {
            Some(msg) if !msg.trim().is_empty() => Self::JobReported(msg.to_string()),
            _ => Self::JobReported(PROCESSING_FAILED_MESSAGE.to_string()),
        }
    }
}
