pub mod competitions;
pub mod documents;
pub mod matches;
pub mod predictions;

use std::fmt;

pub use competitions::{latest_competitions, league_status, search_competitions, CompetitionStatus};
pub use documents::inspect_document;
pub use matches::{
    duplicate_report, find_matches, first_finished, load_matches, team_pair_report, DuplicateReport,
};
pub use predictions::{audit_orphans, load_predictions, OrphanAudit, PredictionOrigin};

/// Top-level collection of contests
pub const COMPETITIONS: &str = "competitions";

/// Top-level collection of curated league fixtures
pub const OFFICIAL_LEAGUES: &str = "official_leagues";

/// Top-level collection of user predictions
pub const PREDICTIONS: &str = "predictions";

/// Sub-collection holding a parent's matches
pub const MATCHES: &str = "matches";

/// Parent document whose `matches` sub-collection is inspected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCollection {
    /// `competitions/{id}/matches`
    Competition(String),
    /// `official_leagues/{id}/matches`
    League(String),
}

impl MatchCollection {
    pub fn path(&self) -> String {
        match self {
            MatchCollection::Competition(id) => format!("{COMPETITIONS}/{id}/{MATCHES}"),
            MatchCollection::League(id) => format!("{OFFICIAL_LEAGUES}/{id}/{MATCHES}"),
        }
    }
}

impl fmt::Display for MatchCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchCollection::Competition(id) => write!(f, "competition {id}"),
            MatchCollection::League(id) => write!(f, "official league {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_collection_path() {
        assert_eq!(
            MatchCollection::Competition("c1".into()).path(),
            "competitions/c1/matches"
        );
        assert_eq!(
            MatchCollection::League("mens-t20-world-cup-2026".into()).path(),
            "official_leagues/mens-t20-world-cup-2026/matches"
        );
    }
}
