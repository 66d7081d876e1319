//! DocDesk Services Layer
//!
//! This crate is the **upload pipeline**: file intake, the per-file status
//! table, the shared catalog context and the session coordinator that ties
//! them to the document service. The HTTP details stay in
//! `docdesk-api-client`; the rules stay in `docdesk-core`.

pub mod backend;
pub mod catalog;
pub mod intake;
pub mod session;
pub mod status_store;

pub use backend::{CatalogSource, DocumentRemover, DocumentSubmitter};
pub use catalog::Catalog;
pub use intake::{read_selection, FileIntake, FileSelection, IntakeBatch, IntakeRecord};
pub use session::{SubmitReport, UploadSession};
pub use status_store::{
    NewCandidate, ReconcileSummary, RemoveResult, StatusCounts, UploadStatusStore,
    SIBLING_DUPLICATE_MESSAGE,
};
