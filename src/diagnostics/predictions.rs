use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{DocumentSource, StructuredQuery};
use crate::models::{flatten, Document, Prediction};
use crate::reconcile::{audit_predictions, OrphanReport};

use super::matches::load_matches;
use super::{MatchCollection, PREDICTIONS};

/// Where the predictions of an audit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionOrigin {
    /// Server-side structured query
    Query,
    /// Full listing filtered on the client
    Listing,
    /// Neither the query nor the listing succeeded
    Unavailable,
}

/// Orphan audit of one competition
#[derive(Debug, Clone, Serialize)]
pub struct OrphanAudit {
    pub competition_id: String,
    pub current_matches: usize,
    pub origin: PredictionOrigin,
    pub report: OrphanReport,
}

fn to_predictions(documents: &[Document]) -> Vec<Prediction> {
    documents
        .iter()
        .map(|doc| Prediction::from_document(&flatten(doc)))
        .collect()
}

/// Predictions of a competition, by query when allowed, else by listing
pub async fn load_predictions(
    source: &dyn DocumentSource,
    competition_id: &str,
) -> (Vec<Prediction>, PredictionOrigin) {
    let query = StructuredQuery::field_equals(PREDICTIONS, "competitionId", competition_id);

    if let Some(documents) = source.run_query("", &query).await {
        info!("Query returned {} predictions", documents.len());
        return (to_predictions(&documents), PredictionOrigin::Query);
    }

    info!("Query failed (probably needs auth), listing predictions instead");

    match source.list_documents(PREDICTIONS).await {
        Ok(documents) => (to_predictions(&documents), PredictionOrigin::Listing),
        Err(e) => {
            warn!("Failed to list predictions: {}", e);
            (Vec::new(), PredictionOrigin::Unavailable)
        }
    }
}

/// Check every prediction of a competition against its current matches
pub async fn audit_orphans(
    source: &dyn DocumentSource,
    competition_id: &str,
) -> Result<OrphanAudit> {
    let collection = MatchCollection::Competition(competition_id.to_string());
    let match_ids: HashSet<String> = load_matches(source, &collection)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    info!("Found {} current matches", match_ids.len());

    let (predictions, origin) = load_predictions(source, competition_id).await;
    let report = audit_predictions(&match_ids, &predictions, Some(competition_id));

    Ok(OrphanAudit {
        competition_id: competition_id.to_string(),
        current_matches: match_ids.len(),
        origin,
        report,
    })
}
