//! Domain methods for the document service client.
//!
//! Paths are the literal contract with the backend.

use crate::ApiClient;
use docdesk_core::{AppError, AuthSetup, ExistingDocument, UploadOutcome, UploadRequest};
use reqwest::multipart::{Form, Part};

pub const GET_DOCS_INFO_PATH: &str = "/get_docs_info";
pub const UPLOAD_DOCUMENTS_PATH: &str = "/upload_documents";
pub const DELETE_DOCUMENTS_PATH: &str = "/delete_documents";
pub const AUTH_SETUP_PATH: &str = "/auth_setup";

/// Multipart field name shared by every uploaded file.
pub const DOCUMENT_FIELD: &str = "document";

/// Build the batch upload form: one `document` part per request, in order.
pub fn build_upload_form(requests: &[UploadRequest], scan_marker: &str) -> Result<Form, AppError> {
    let mut form = Form::new();
    for request in requests {
        let part = Part::bytes(request.content.to_vec())
            .file_name(request.transmitted_filename(scan_marker))
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::Internal(format!("Invalid part mime type: {}", e)))?;
        form = form.part(DOCUMENT_FIELD, part);
    }
    Ok(form)
}

#[derive(serde::Serialize)]
struct DeleteRequest<'a> {
    filename: &'a str,
}

impl ApiClient {
    /// Fetch the existing document catalog.
    pub async fn get_docs_info(&self, token: Option<&str>) -> Result<Vec<ExistingDocument>, AppError> {
        self.get(GET_DOCS_INFO_PATH, token).await
    }

    /// Send all requests in one multipart POST and return the server's per-file outcomes verbatim.
    ///
    /// Files flagged for scanning are sent with `scan_marker` appended to their name.
    pub async fn upload_documents(
        &self,
        requests: &[UploadRequest],
        scan_marker: &str,
        token: Option<&str>,
    ) -> Result<Vec<UploadOutcome>, AppError> {
        let form = build_upload_form(requests, scan_marker)?;

        tracing::info!(count = requests.len(), "Submitting upload batch");

        let outcomes: Vec<UploadOutcome> = self
            .post_multipart(UPLOAD_DOCUMENTS_PATH, form, token)
            .await?;

        tracing::info!(
            submitted = requests.len(),
            outcomes = outcomes.len(),
            "Upload batch answered"
        );

        Ok(outcomes)
    }

    /// Delete every indexed document originating from `filename`.
    pub async fn delete_document(&self, filename: &str, token: Option<&str>) -> Result<(), AppError> {
        self.delete_json(DELETE_DOCUMENTS_PATH, &DeleteRequest { filename }, token)
            .await
            .map_err(|e| match e {
                AppError::ServerRejected { status, .. } => AppError::ServerRejected {
                    status,
                    message: "Failed to delete document".to_string(),
                },
                other => other,
            })
    }

    /// Fetch the auth configuration. Never sends credentials.
    pub async fn auth_setup(&self) -> Result<AuthSetup, AppError> {
        let response = self
            .client()
            .get(self.build_url(AUTH_SETUP_PATH))
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ServerRejected {
                status: response.status().as_u16(),
                message: format!("auth setup response was not ok: {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(format!("Failed to parse auth setup: {}", e)))
    }
}
