use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::DocumentSource;
use crate::models::{flatten, Match, STATUS_FINISHED};
use crate::reconcile::{find_duplicates, tally_pairs, DuplicateCluster, PairCount, UnknownTimePolicy};

use super::MatchCollection;

/// Fetch and map every match of a collection
pub async fn load_matches(
    source: &dyn DocumentSource,
    collection: &MatchCollection,
) -> Result<Vec<Match>> {
    let documents = source
        .list_documents(&collection.path())
        .await
        .with_context(|| format!("Failed to fetch matches for {collection}"))?;

    let matches: Vec<Match> = documents
        .iter()
        .map(|doc| Match::from_document(&flatten(doc)))
        .collect();

    info!("Loaded {} matches for {}", matches.len(), collection);
    Ok(matches)
}

/// Per-label counts of `"team1 vs team2"`
pub async fn team_pair_report(
    source: &dyn DocumentSource,
    collection: &MatchCollection,
) -> Result<Vec<PairCount>> {
    let matches = load_matches(source, collection).await?;
    Ok(tally_pairs(&matches))
}

/// Duplicate clusters plus the number of matches scanned
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub scanned: usize,
    pub policy: UnknownTimePolicy,
    pub clusters: Vec<DuplicateCluster>,
}

impl DuplicateReport {
    /// Clusters that exist only because scheduled times were missing
    pub fn unknown_time_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| c.unknown_time()).count()
    }
}

pub async fn duplicate_report(
    source: &dyn DocumentSource,
    collection: &MatchCollection,
    policy: UnknownTimePolicy,
) -> Result<DuplicateReport> {
    let matches = load_matches(source, collection).await?;
    let clusters = find_duplicates(&matches, policy);

    debug!("Found {} duplicate clusters in {}", clusters.len(), collection);

    Ok(DuplicateReport {
        scanned: matches.len(),
        policy,
        clusters,
    })
}

/// Matches whose team names contain the given fragments, in stored order
pub async fn find_matches(
    source: &dyn DocumentSource,
    collection: &MatchCollection,
    team1: &str,
    team2: &str,
) -> Result<Vec<Match>> {
    let matches = load_matches(source, collection).await?;

    Ok(matches
        .into_iter()
        .filter(|m| m.team1.contains(team1) && m.team2.contains(team2))
        .collect())
}

/// First match whose status is `finished`
pub async fn first_finished(
    source: &dyn DocumentSource,
    collection: &MatchCollection,
) -> Result<Option<Match>> {
    let matches = load_matches(source, collection).await?;
    Ok(matches.into_iter().find(|m| m.status == STATUS_FINISHED))
}
