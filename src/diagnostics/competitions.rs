use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::DocumentSource;
use crate::models::{competition::sort_latest_first, flatten, Competition};
use crate::reconcile::count_non_upcoming;

use super::matches::load_matches;
use super::{MatchCollection, COMPETITIONS};

async fn load_competitions(source: &dyn DocumentSource) -> Result<Vec<Competition>> {
    let documents = source
        .list_documents(COMPETITIONS)
        .await
        .context("Failed to fetch competitions")?;

    Ok(documents
        .iter()
        .map(|doc| Competition::from_document(&flatten(doc)))
        .collect())
}

/// Newest competitions first, at most `limit`
pub async fn latest_competitions(
    source: &dyn DocumentSource,
    limit: usize,
) -> Result<Vec<Competition>> {
    let mut competitions = load_competitions(source).await?;
    sort_latest_first(&mut competitions);
    competitions.truncate(limit);
    Ok(competitions)
}

/// Competitions whose name or league ID contains `term`, case-insensitive
pub async fn search_competitions(
    source: &dyn DocumentSource,
    term: &str,
) -> Result<Vec<Competition>> {
    let competitions = load_competitions(source).await?;
    Ok(competitions
        .into_iter()
        .filter(|c| c.matches_term(term))
        .collect())
}

/// Non-upcoming match count for one competition
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionStatus {
    pub competition: Competition,
    /// `None` when the competition's matches could not be fetched
    pub non_upcoming: Option<usize>,
}

/// Count non-upcoming matches in every competition of a league.
///
/// A competition whose matches fail to load is reported without a count and
/// the remaining competitions are still processed.
pub async fn league_status(
    source: &dyn DocumentSource,
    league_id: &str,
) -> Result<Vec<CompetitionStatus>> {
    let competitions: Vec<Competition> = load_competitions(source)
        .await?
        .into_iter()
        .filter(|c| c.league_id == league_id)
        .collect();

    info!("Found {} competitions in league {}", competitions.len(), league_id);

    let mut statuses = Vec::with_capacity(competitions.len());
    for competition in competitions {
        let collection = MatchCollection::Competition(competition.id.clone());

        let non_upcoming = match load_matches(source, &collection).await {
            Ok(matches) => Some(count_non_upcoming(&matches)),
            Err(e) => {
                warn!("Skipping {}: {:#}", collection, e);
                None
            }
        };

        statuses.push(CompetitionStatus {
            competition,
            non_upcoming,
        });
    }

    Ok(statuses)
}
