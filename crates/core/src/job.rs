//! Job identifiers, lifecycle states and the job record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Backend-assigned job identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a raw identifier, rejecting blank strings.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-visible lifecycle state of the current job.
///
/// ```text
/// Idle -> Uploading -> Processing -> Completed
///              |            |
///              +------------+-----> Error
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Uploading,
    Processing,
    Completed { result: String },
    Error { message: String },
}

impl JobState {
    /// `Completed` and `Error` are only left by a fresh submission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Error { .. })
    }

    /// Whether a submission or poll is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::Processing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Completed { .. } => "completed",
            Self::Error { .. } => "error",
        }
    }
}

/// A job accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
    pub target_language: String,
    pub submitted_at: Timestamp,
}

impl Job {
    pub fn new(id: JobId, target_language: impl Into<String>) -> Self {
        Self {
            id,
            target_language: target_language.into(),
            submitted_at: chrono::Utc::now(),
        }
    }
}
