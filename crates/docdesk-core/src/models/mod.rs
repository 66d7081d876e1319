pub mod auth;
pub mod candidate;
pub mod document;
pub mod outcome;

pub use auth::{AuthSetup, ScopeRequest};
pub use candidate::{
    extension_of, CandidateId, FileCandidate, IntakeBatchId, IntakeTag, UploadStatus,
};
pub use document::ExistingDocument;
pub use outcome::{strip_scan_marker, OutcomeKind, UploadOutcome, UploadRequest};
