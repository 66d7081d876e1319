//! Upload page coordinator
//!
//! Ties intake, validation, the status table and the submitter together.
//! Dependencies are handed in at construction; nothing here is global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use docdesk_core::{
    AppError, CandidateId, ErrorMetadata, LogLevel, UploadPolicy, UploadStatus, ValidationEngine,
};

use crate::backend::DocumentSubmitter;
use crate::catalog::Catalog;
use crate::intake::{FileIntake, FileSelection, IntakeBatch};
use crate::status_store::{NewCandidate, RemoveResult, UploadStatusStore};

/// What one submit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub processing: usize,
    /// Set when the whole batch failed (transport or server rejection).
    pub batch_error: Option<String>,
}

impl SubmitReport {
    pub fn is_batch_failure(&self) -> bool {
        self.batch_error.is_some()
    }
}

/// Clears the in-flight flag however the submit ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct UploadSession {
    store: UploadStatusStore,
    catalog: Catalog,
    engine: ValidationEngine,
    submitter: Arc<dyn DocumentSubmitter>,
    intake: FileIntake,
    submitting: AtomicBool,
    scan_marker: String,
}

impl UploadSession {
    pub fn new(catalog: Catalog, policy: &UploadPolicy, submitter: Arc<dyn DocumentSubmitter>) -> Self {
        Self {
            store: UploadStatusStore::new(),
            catalog,
            engine: ValidationEngine::from_policy(policy),
            submitter,
            intake: FileIntake::new(),
            submitting: AtomicBool::new(false),
            scan_marker: policy.scan_marker.clone(),
        }
    }

    pub fn store(&self) -> &UploadStatusStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Read, validate and record a selection. Returns the new ids in selection order.
    pub async fn add_files(&self, selections: Vec<FileSelection>) -> Result<Vec<CandidateId>, AppError> {
        let batch = self.intake.read(selections).await?;
        Ok(self.add_batch(batch).await)
    }

    /// Validate an already-read batch against the current catalog and record it.
    pub async fn add_batch(&self, batch: IntakeBatch) -> Vec<CandidateId> {
        let catalog = self.catalog.snapshot().await;

        let candidates: Vec<NewCandidate> = batch
            .records
            .into_iter()
            .map(|record| {
                let verdict = self
                    .engine
                    .validate(&record.filename, record.content.len(), &catalog);
                NewCandidate {
                    tag: record.tag,
                    filename: record.filename,
                    content: record.content,
                    status: UploadStatus::from(verdict),
                }
            })
            .collect();

        let ids = self.store.append(candidates).await;
        tracing::info!(batch = batch.id.0, count = ids.len(), "Files added");
        ids
    }

    pub async fn toggle_scan(&self, id: CandidateId, scan_requested: bool) -> Result<(), AppError> {
        self.store.set_scan_requested(id, scan_requested).await
    }

    pub async fn remove(&self, id: CandidateId) -> Result<RemoveResult, AppError> {
        let result = self.store.remove(id).await?;
        tracing::debug!(candidate = %id, result = ?result, "Candidate removed");
        Ok(result)
    }

    /// Submit every `Ready` candidate as one batch and record the outcomes.
    ///
    /// Fails with [`AppError::SubmitInProgress`] while another submit is
    /// outstanding. Batch-wide failures are recorded on the entries and
    /// reported in [`SubmitReport::batch_error`], not returned as `Err`.
    pub async fn submit(&self, token: Option<&str>) -> Result<SubmitReport, AppError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::SubmitInProgress);
        }
        let _guard = SubmitGuard(&self.submitting);

        let batch = self.store.begin_submit().await;
        if batch.is_empty() {
            tracing::debug!("Nothing ready to submit");
            return Ok(SubmitReport::default());
        }

        let (ids, requests): (Vec<_>, Vec<_>) = batch.into_iter().unzip();
        let mut report = SubmitReport {
            submitted: ids.len(),
            ..Default::default()
        };

        tracing::info!(count = report.submitted, "Submitting documents");

        match self
            .submitter
            .submit(&requests, &self.scan_marker, token)
            .await
        {
            Ok(outcomes) => {
                let summary = self.store.reconcile(&ids, &outcomes, &self.scan_marker).await;
                report.succeeded = summary.succeeded;
                report.failed = summary.failed;
                report.processing = summary.processing;
                tracing::info!(
                    succeeded = report.succeeded,
                    failed = report.failed,
                    processing = report.processing,
                    "Submit finished"
                );
            }
            Err(e) => {
                match e.log_level() {
                    LogLevel::Error => {
                        tracing::error!(error = %e, code = e.error_code(), "Upload batch failed")
                    }
                    _ => tracing::warn!(error = %e, code = e.error_code(), "Upload batch failed"),
                }
                let message = e.client_message();
                report.failed = self.store.fail_batch(&ids, &message).await;
                report.batch_error = Some(message);
            }
        }

        Ok(report)
    }
}
