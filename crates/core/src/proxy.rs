//! Contracts for the two network-facing collaborators of the job controller.
//!
//! Implementations make exactly one outbound call per invocation and never
//! retry. Every failure is normalized into a [`JobError`] carrying a
//! human-readable message.

use async_trait::async_trait;

use crate::error::JobError;
use crate::job::JobId;
use crate::status::StatusSnapshot;
use crate::upload::UploadRequest;

/// Hands an upload to the backend and returns the job identifier it assigns.
#[async_trait]
pub trait SubmissionProxy: Send + Sync {
    /// Fails with [`JobError::UploadFailed`] or
    /// [`JobError::MissingJobIdentifier`].
    async fn submit(&self, request: &UploadRequest) -> Result<JobId, JobError>;
}

/// Looks up the current state of a job.
#[async_trait]
pub trait StatusProxy: Send + Sync {
    /// Fails with [`JobError::StatusCheckFailed`].
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot, JobError>;
}
