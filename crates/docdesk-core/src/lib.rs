//! DocDesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! upload validation engine shared by the API client, the service layer and
//! the CLI. Nothing in here touches the network.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, UploadPolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    extension_of, strip_scan_marker, AuthSetup, CandidateId, ExistingDocument, FileCandidate,
    IntakeBatchId, IntakeTag, OutcomeKind, ScopeRequest, UploadOutcome, UploadRequest,
    UploadStatus,
};
pub use validation::{size_in_mb, Rejection, ValidationEngine, ValidationInput, ValidationRule, Verdict};
