use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::Document;

use super::query::StructuredQuery;

/// Read access to a document tree, addressed by paths relative to the database root
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// All documents of a collection such as `competitions/{id}/matches`
    async fn list_documents(&self, collection_path: &str) -> Result<Vec<Document>, FetchError>;

    /// A single document, `None` when it does not exist
    async fn get_document(&self, document_path: &str) -> Result<Option<Document>, FetchError>;

    /// Server-side query under `parent_path` (empty for the root).
    ///
    /// Probe semantics: any failure, including missing privileges, and an
    /// empty result both yield `None` so the caller can list and filter instead.
    async fn run_query(&self, parent_path: &str, query: &StructuredQuery) -> Option<Vec<Document>>;
}

/// File name used for the raw response of a path
pub fn snapshot_file_name(path: &str) -> String {
    let sanitized: String = path
        .trim_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        "root.json".to_string()
    } else {
        format!("{sanitized}.json")
    }
}
