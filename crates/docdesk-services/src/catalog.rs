//! Shared document catalog context

use std::sync::Arc;
use tokio::sync::RwLock;

use docdesk_core::{AppError, ExistingDocument};

use crate::backend::{CatalogSource, DocumentRemover};

/// Handle to the authoritative list of documents already stored server-side.
///
/// Cloning shares the same list. Pass it explicitly to whoever needs it
/// (the upload session for duplicate checks, the delete flow for updates).
#[derive(Clone, Default)]
pub struct Catalog {
    documents: Arc<RwLock<Vec<ExistingDocument>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<ExistingDocument>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub async fn snapshot(&self) -> Vec<ExistingDocument> {
        self.documents.read().await.clone()
    }

    pub async fn replace(&self, documents: Vec<ExistingDocument>) {
        *self.documents.write().await = documents;
    }

    /// Reload from the document service. Returns the number of entries.
    pub async fn refresh(
        &self,
        source: &dyn CatalogSource,
        token: Option<&str>,
    ) -> Result<usize, AppError> {
        let documents = source.fetch_catalog(token).await?;
        let count = documents.len();
        self.replace(documents).await;
        tracing::debug!(count, "Catalog refreshed");
        Ok(count)
    }

    pub async fn contains(&self, filename: &str) -> bool {
        self.documents
            .read()
            .await
            .iter()
            .any(|doc| doc.filename == filename)
    }

    pub async fn filenames(&self) -> Vec<String> {
        self.documents
            .read()
            .await
            .iter()
            .map(|doc| doc.filename.clone())
            .collect()
    }

    /// Drop every entry with this filename. Returns whether anything was removed.
    pub async fn remove(&self, filename: &str) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| doc.filename != filename);
        documents.len() != before
    }

    /// Delete on the server, then drop the entry locally.
    pub async fn delete_document(
        &self,
        filename: &str,
        remover: &dyn DocumentRemover,
        token: Option<&str>,
    ) -> Result<(), AppError> {
        remover.remove_document(filename, token).await?;
        self.remove(filename).await;
        tracing::info!(filename = %filename, "Document deleted");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}
