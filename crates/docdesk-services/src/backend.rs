//! Seams between the upload pipeline and the document service.
//!
//! The session and catalog only talk to these traits; [`ApiClient`] is the
//! production implementation and tests plug in in-memory fakes.

use async_trait::async_trait;
use docdesk_api_client::ApiClient;
use docdesk_core::{AppError, ExistingDocument, UploadOutcome, UploadRequest};

/// Sends one batch of files and returns the server's per-file outcomes.
///
/// Files flagged for scanning travel with `scan_marker` appended to their name.
#[async_trait]
pub trait DocumentSubmitter: Send + Sync {
    async fn submit(
        &self,
        requests: &[UploadRequest],
        scan_marker: &str,
        token: Option<&str>,
    ) -> Result<Vec<UploadOutcome>, AppError>;
}

/// Supplies the existing document catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self, token: Option<&str>) -> Result<Vec<ExistingDocument>, AppError>;
}

/// Deletes a stored document by filename.
#[async_trait]
pub trait DocumentRemover: Send + Sync {
    async fn remove_document(&self, filename: &str, token: Option<&str>) -> Result<(), AppError>;
}

#[async_trait]
impl DocumentSubmitter for ApiClient {
    async fn submit(
        &self,
        requests: &[UploadRequest],
        scan_marker: &str,
        token: Option<&str>,
    ) -> Result<Vec<UploadOutcome>, AppError> {
        self.upload_documents(requests, scan_marker, token).await
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_catalog(&self, token: Option<&str>) -> Result<Vec<ExistingDocument>, AppError> {
        self.get_docs_info(token).await
    }
}

#[async_trait]
impl DocumentRemover for ApiClient {
    async fn remove_document(&self, filename: &str, token: Option<&str>) -> Result<(), AppError> {
        self.delete_document(filename, token).await
    }
}
