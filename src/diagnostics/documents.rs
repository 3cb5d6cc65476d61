use anyhow::{Context, Result};

use crate::api::DocumentSource;
use crate::models::{flatten, FlatDocument};

/// Fetch one document by path and unwrap its fields
pub async fn inspect_document(
    source: &dyn DocumentSource,
    document_path: &str,
) -> Result<Option<FlatDocument>> {
    let document = source
        .get_document(document_path)
        .await
        .with_context(|| format!("Failed to fetch document {document_path}"))?;

    Ok(document.as_ref().map(flatten))
}
