use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::candidate::FileCandidate;

/// One file as it goes over the wire in a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub content: Bytes,
    pub scan_requested: bool,
}

impl UploadRequest {
    /// Filename sent in the multipart part: suffixed with `scan_marker` only
    /// when a scan was requested.
    pub fn transmitted_filename(&self, scan_marker: &str) -> String {
        if self.scan_requested {
            format!("{}{}", self.filename, scan_marker)
        } else {
            self.filename.clone()
        }
    }
}

impl From<&FileCandidate> for UploadRequest {
    fn from(candidate: &FileCandidate) -> Self {
        UploadRequest {
            filename: candidate.filename().to_string(),
            content: candidate.content().clone(),
            scan_requested: candidate.scan_requested(),
        }
    }
}

/// Remove a trailing scan marker, if present.
pub fn strip_scan_marker<'a>(filename: &'a str, scan_marker: &str) -> &'a str {
    filename.strip_suffix(scan_marker).unwrap_or(filename)
}

/// Server-reported result for one file of a batch upload.
///
/// The backend answers with `{"filename": .., "success": true}` or
/// `{"filename": .., "error": ".."}`; `processing` and `message` are
/// optional extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub processing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Interpretation of an [`UploadOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Accepted,
    /// Accepted, but the server signalled further asynchronous work.
    Processing,
    Rejected(String),
}

impl UploadOutcome {
    pub fn accepted(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            error: None,
            processing: false,
            message: None,
        }
    }

    pub fn rejected(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            error: Some(error.into()),
            processing: false,
            message: None,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        if let Some(error) = &self.error {
            return OutcomeKind::Rejected(error.clone());
        }
        if !self.success {
            return OutcomeKind::Rejected(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Upload was not accepted".to_string()),
            );
        }
        if self.processing {
            OutcomeKind::Processing
        } else {
            OutcomeKind::Accepted
        }
    }
}
