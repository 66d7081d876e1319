use serde::{Deserialize, Serialize};

/// One entry of the server-side document catalog (`GET /get_docs_info`).
///
/// Read-only from the upload pipeline's point of view; only `filename` takes
/// part in validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingDocument {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl ExistingDocument {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            category: None,
            title: None,
            summary: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_entry_ignores_search_fields() {
        let json = r#"{
            "id": "file-report_pdf",
            "filename": "report.pdf",
            "category": "finance",
            "title": "Quarterly report",
            "summary": "Revenue grew.",
            "@search.score": 1.0
        }"#;
        let doc: ExistingDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.filename, "report.pdf");
        assert_eq!(doc.category.as_deref(), Some("finance"));
        assert_eq!(doc.title.as_deref(), Some("Quarterly report"));
    }

    #[test]
    fn test_deserialize_catalog_entry_with_nulls() {
        let json = r#"{"id": "a", "filename": "a.txt", "category": null}"#;
        let doc: ExistingDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc, ExistingDocument::new("a", "a.txt"));
    }
}
