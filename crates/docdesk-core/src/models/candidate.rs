use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Stable identity of a candidate inside one console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Generation number handed out to each intake call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeBatchId(pub u64);

/// Where a candidate came from: its intake generation and position in that selection.
///
/// Ordering candidates by tag keeps the table deterministic when overlapping
/// intakes resolve out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntakeTag {
    pub batch: IntakeBatchId,
    pub position: usize,
}

/// Lifecycle state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadStatus {
    Ready,
    Error { message: String },
    Uploading,
    Processing,
    Success,
    /// Reserved for server-driven prompts; nothing in the current flow produces it.
    ActionRequired { message: String },
}

impl UploadStatus {
    pub fn error(message: impl Into<String>) -> Self {
        UploadStatus::Error {
            message: message.into(),
        }
    }

    /// Text shown next to the candidate in the status column.
    pub fn message(&self) -> String {
        match self {
            UploadStatus::Ready => "Ready to upload".to_string(),
            UploadStatus::Error { message } => message.clone(),
            UploadStatus::Uploading => "Uploading...".to_string(),
            UploadStatus::Processing => "Processing...".to_string(),
            UploadStatus::Success => "Uploaded".to_string(),
            UploadStatus::ActionRequired { message } => format!("Action Required: {}", message),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, UploadStatus::Ready)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, UploadStatus::Error { .. })
    }

    /// `Error` and `Success` never move again for the current submission cycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Error { .. } | UploadStatus::Success)
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Ready => write!(f, "ready"),
            UploadStatus::Error { .. } => write!(f, "error"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Success => write!(f, "success"),
            UploadStatus::ActionRequired { .. } => write!(f, "action_required"),
        }
    }
}

/// Substring after the last `.`; `None` when there is no dot or nothing follows it.
pub fn extension_of(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// A file the user selected, fully read into memory.
///
/// `content` is fixed at construction; only `status` and `scan_requested`
/// change afterwards.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    id: CandidateId,
    tag: IntakeTag,
    filename: String,
    content: Bytes,
    scan_requested: bool,
    status: UploadStatus,
}

impl FileCandidate {
    pub fn new(
        id: CandidateId,
        tag: IntakeTag,
        filename: impl Into<String>,
        content: Bytes,
        status: UploadStatus,
    ) -> Self {
        Self {
            id,
            tag,
            filename: filename.into(),
            content,
            scan_requested: false,
            status,
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn tag(&self) -> IntakeTag {
        self.tag
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.filename)
    }

    pub fn scan_requested(&self) -> bool {
        self.scan_requested
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn set_scan_requested(&mut self, scan_requested: bool) {
        self.scan_requested = scan_requested;
    }

    pub fn set_status(&mut self, status: UploadStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag() -> IntakeTag {
        IntakeTag {
            batch: IntakeBatchId(1),
            position: 0,
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.pdf"), Some("pdf"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".env"), Some("env"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("Scan.PDF"), Some("PDF"));
    }

    #[test]
    fn test_candidate_derived_fields() {
        let candidate = FileCandidate::new(
            CandidateId(7),
            tag(),
            "notes.txt",
            Bytes::from_static(b"hello"),
            UploadStatus::Ready,
        );
        assert_eq!(candidate.size_bytes(), 5);
        assert_eq!(candidate.extension(), Some("txt"));
        assert!(!candidate.scan_requested());
        assert!(candidate.status().is_ready());
    }

    #[test]
    fn test_status_messages_and_display() {
        assert_eq!(UploadStatus::Ready.message(), "Ready to upload");
        assert_eq!(UploadStatus::Uploading.message(), "Uploading...");
        assert_eq!(UploadStatus::Processing.message(), "Processing...");
        assert_eq!(
            UploadStatus::ActionRequired {
                message: "confirm overwrite".to_string()
            }
            .message(),
            "Action Required: confirm overwrite"
        );
        assert_eq!(UploadStatus::error("boom").to_string(), "error");
        assert_eq!(UploadStatus::Success.to_string(), "success");
    }

    #[test]
    fn test_status_terminality() {
        assert!(UploadStatus::Success.is_terminal());
        assert!(UploadStatus::error("x").is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
        assert!(!UploadStatus::Ready.is_terminal());
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_value(UploadStatus::error("too big")).unwrap();
        assert_eq!(json["state"], "error");
        assert_eq!(json["message"], "too big");

        let ready = serde_json::to_value(UploadStatus::Ready).unwrap();
        assert_eq!(ready["state"], "ready");
    }

    #[test]
    fn test_intake_tag_orders_by_batch_then_position() {
        let a = IntakeTag {
            batch: IntakeBatchId(1),
            position: 5,
        };
        let b = IntakeTag {
            batch: IntakeBatchId(2),
            position: 0,
        };
        assert!(a < b);
    }
}
