//! Per-candidate upload status table
//!
//! Every mutation goes through one of the transition methods below, each of
//! which holds the write lock for its whole duration. A batch of transitions
//! (e.g. every `Ready` entry moving to `Uploading`) is therefore observed
//! all-or-nothing by readers.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use bytes::Bytes;
use docdesk_core::{
    strip_scan_marker, AppError, CandidateId, FileCandidate, IntakeTag, OutcomeKind,
    UploadOutcome, UploadRequest, UploadStatus,
};

/// Status given to a new ready candidate whose filename is already held by a
/// live entry of the table.
pub const SIBLING_DUPLICATE_MESSAGE: &str = "Error: File with this name is already selected";

/// Status given to a submitted candidate the server did not report on.
pub const MISSING_OUTCOME_MESSAGE: &str = "Error: No result returned by server";

/// A validated file waiting to enter the table.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub tag: IntakeTag,
    pub filename: String,
    pub content: Bytes,
    pub status: UploadStatus,
}

/// What happened on removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    Removed,
    /// The last entry went away; the table is empty again. Ids keep counting.
    Reset,
}

/// Number of entries per state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub ready: usize,
    pub error: usize,
    pub uploading: usize,
    pub processing: usize,
    pub success: usize,
    pub action_required: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.ready
            + self.error
            + self.uploading
            + self.processing
            + self.success
            + self.action_required
    }
}

/// Per-file results of reconciling one batch response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub processing: usize,
}

#[derive(Default)]
struct StoreInner {
    entries: Vec<FileCandidate>,
    next_id: u64,
}

impl StoreInner {
    fn find_mut(&mut self, id: CandidateId) -> Result<&mut FileCandidate, AppError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", id)))
    }

    /// Names held by live entries. Rejected entries never hold a name.
    fn claimed_names(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.status().is_error())
            .map(|entry| entry.filename().to_string())
            .collect()
    }
}

/// Shared, cloneable handle to the status table.
#[derive(Clone, Default)]
pub struct UploadStatusStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl UploadStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add validated candidates and return their ids in input order.
    ///
    /// A new candidate whose name is held by a live entry, or by an earlier
    /// candidate of the same call, is recorded as a sibling duplicate. Entries
    /// already in the table keep their status. The table stays ordered by
    /// intake tag, so overlapping intakes merge deterministically regardless
    /// of which finished first.
    pub async fn append(&self, candidates: Vec<NewCandidate>) -> Vec<CandidateId> {
        let mut inner = self.inner.write().await;
        let mut ids = Vec::with_capacity(candidates.len());
        let mut claimed = inner.claimed_names();

        for mut candidate in candidates {
            if !candidate.status.is_error() && !claimed.insert(candidate.filename.clone()) {
                tracing::debug!(filename = %candidate.filename, "Sibling duplicate rejected");
                candidate.status = UploadStatus::error(SIBLING_DUPLICATE_MESSAGE);
            }

            inner.next_id += 1;
            let id = CandidateId(inner.next_id);
            inner.entries.push(FileCandidate::new(
                id,
                candidate.tag,
                candidate.filename,
                candidate.content,
                candidate.status,
            ));
            ids.push(id);
        }

        inner.entries.sort_by_key(|entry| entry.tag());
        ids
    }

    pub async fn snapshot(&self) -> Vec<FileCandidate> {
        self.inner.read().await.entries.clone()
    }

    pub async fn get(&self, id: CandidateId) -> Option<FileCandidate> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    pub async fn counts(&self) -> StatusCounts {
        let inner = self.inner.read().await;
        let mut counts = StatusCounts::default();
        for entry in &inner.entries {
            match entry.status() {
                UploadStatus::Ready => counts.ready += 1,
                UploadStatus::Error { .. } => counts.error += 1,
                UploadStatus::Uploading => counts.uploading += 1,
                UploadStatus::Processing => counts.processing += 1,
                UploadStatus::Success => counts.success += 1,
                UploadStatus::ActionRequired { .. } => counts.action_required += 1,
            }
        }
        counts
    }

    /// Toggle the scan flag. Not allowed while the file is on the wire.
    pub async fn set_scan_requested(
        &self,
        id: CandidateId,
        scan_requested: bool,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let entry = inner.find_mut(id)?;
        if matches!(entry.status(), UploadStatus::Uploading) {
            return Err(AppError::InvalidInput(format!(
                "Cannot change scan flag of '{}' while it is uploading",
                entry.filename()
            )));
        }
        entry.set_scan_requested(scan_requested);
        Ok(())
    }

    /// Move every `Ready` entry to `Uploading` at once and return what to send.
    pub async fn begin_submit(&self) -> Vec<(CandidateId, UploadRequest)> {
        let mut inner = self.inner.write().await;
        inner
            .entries
            .iter_mut()
            .filter(|entry| entry.status().is_ready())
            .map(|entry| {
                entry.set_status(UploadStatus::Uploading);
                (entry.id(), UploadRequest::from(&*entry))
            })
            .collect()
    }

    /// Apply the server's per-file outcomes to the submitted entries.
    ///
    /// Outcomes are matched by filename with the scan marker stripped; each
    /// outcome is used at most once. Submitted entries without an outcome end
    /// in `Error`. Entries removed or no longer `Uploading` are skipped.
    pub async fn reconcile(
        &self,
        submitted: &[CandidateId],
        outcomes: &[UploadOutcome],
        scan_marker: &str,
    ) -> ReconcileSummary {
        let mut inner = self.inner.write().await;
        let mut used = vec![false; outcomes.len()];
        let mut summary = ReconcileSummary::default();

        for id in submitted {
            let Ok(entry) = inner.find_mut(*id) else {
                continue;
            };
            if !matches!(entry.status(), UploadStatus::Uploading) {
                continue;
            }

            let matched = (0..outcomes.len()).find(|&index| {
                !used[index]
                    && strip_scan_marker(&outcomes[index].filename, scan_marker) == entry.filename()
            });

            let status = match matched {
                Some(index) => {
                    used[index] = true;
                    match outcomes[index].kind() {
                        OutcomeKind::Accepted => {
                            summary.succeeded += 1;
                            UploadStatus::Success
                        }
                        OutcomeKind::Processing => {
                            summary.processing += 1;
                            UploadStatus::Processing
                        }
                        OutcomeKind::Rejected(message) => {
                            summary.failed += 1;
                            UploadStatus::error(message)
                        }
                    }
                }
                None => {
                    summary.failed += 1;
                    UploadStatus::error(MISSING_OUTCOME_MESSAGE)
                }
            };

            tracing::debug!(filename = %entry.filename(), status = %status, "Outcome reconciled");
            entry.set_status(status);
        }

        summary
    }

    /// Batch-wide failure: every submitted entry still `Uploading` becomes `Error`.
    pub async fn fail_batch(&self, submitted: &[CandidateId], message: &str) -> usize {
        let mut inner = self.inner.write().await;
        let mut failed = 0;
        for entry in inner.entries.iter_mut() {
            if submitted.contains(&entry.id()) && matches!(entry.status(), UploadStatus::Uploading) {
                entry.set_status(UploadStatus::error(message));
                failed += 1;
            }
        }
        failed
    }

    /// Remove one entry. Removing the last one resets the table.
    pub async fn remove(&self, id: CandidateId) -> Result<RemoveResult, AppError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", id)))?;

        if inner.entries.len() == 1 {
            inner.entries.clear();
            return Ok(RemoveResult::Reset);
        }

        inner.entries.remove(index);
        Ok(RemoveResult::Removed)
    }

    /// Drop every entry (the full-page reload equivalent). Ids keep counting.
    pub async fn reset(&self) {
        self.inner.write().await.entries.clear();
    }
}
