use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{Document, ListResponse};

use super::query::StructuredQuery;
use super::source::{snapshot_file_name, DocumentSource};

/// Reads responses previously written to a snapshot directory
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, path: &str) -> Result<String, FetchError> {
        let file = self.dir.join(snapshot_file_name(path));
        debug!("Reading snapshot {}", file.display());

        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::SnapshotMissing(path.to_string()))
            }
            Err(source) => Err(FetchError::Io { path: file, source }),
        }
    }
}

#[async_trait]
impl DocumentSource for SnapshotSource {
    async fn list_documents(&self, collection_path: &str) -> Result<Vec<Document>, FetchError> {
        let body = self.read(collection_path).await?;
        let response: ListResponse =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                origin: collection_path.to_string(),
                source,
            })?;

        Ok(response.documents)
    }

    async fn get_document(&self, document_path: &str) -> Result<Option<Document>, FetchError> {
        let body = match self.read(document_path).await {
            Ok(body) => body,
            Err(FetchError::SnapshotMissing(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let document = serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            origin: document_path.to_string(),
            source,
        })?;

        Ok(Some(document))
    }

    /// Snapshots cannot evaluate queries, callers always fall back to listing
    async fn run_query(&self, _parent_path: &str, _query: &StructuredQuery) -> Option<Vec<Document>> {
        None
    }
}
