//! Video payloads and validated upload requests.

use std::fmt;

use crate::error::{JobError, MISSING_FILE_MESSAGE};
use crate::language;

/// Multipart field carrying the video bytes.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the target language code.
pub const TARGET_LANGUAGE_FIELD: &str = "target_language";

/// An opaque video payload selected by the user.
///
/// The bytes are never inspected; only presence is checked.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl VideoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Attach a MIME type to send alongside the bytes.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Keep megabytes of video out of debug logs.
impl fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One submission attempt: a video plus the language to translate into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: VideoFile,
    pub target_language: String,
}

impl UploadRequest {
    /// Build a request from the user's current selection.
    ///
    /// Rejects a missing file and any language outside the catalog with
    /// [`JobError::Validation`], so nothing invalid reaches the network.
    pub fn validated(file: Option<VideoFile>, target_language: &str) -> Result<Self, JobError> {
        let file = file.ok_or_else(|| JobError::Validation(MISSING_FILE_MESSAGE.to_string()))?;

        if !language::is_supported(target_language) {
            return Err(JobError::Validation(format!(
                "Unsupported target language: {target_language}"
            )));
        }

        Ok(Self {
            file,
            target_language: target_language.to_string(),
        })
    }
}
