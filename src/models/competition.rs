use chrono::{DateTime, Utc};
use serde::Serialize;

use super::document::FlatDocument;

/// A contest grouping matches in its `matches` sub-collection
#[derive(Debug, Clone, Serialize)]
pub struct Competition {
    pub id: String,
    pub name: String,
    /// Empty when absent
    pub league_id: String,
    /// Empty when absent
    pub sport: String,
    /// Document creation time as reported by the store
    pub create_time: Option<String>,
}

impl Competition {
    pub fn from_document(doc: &FlatDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.text("name").to_string(),
            league_id: doc.text_or("leagueId", "").to_string(),
            sport: doc.text_or("sport", "").to_string(),
            create_time: doc.create_time.clone(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// Case-insensitive substring match on name or league ID
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.league_id.to_lowercase().contains(&term)
    }
}

/// Sort newest first; competitions without a creation time go last
pub fn sort_latest_first(competitions: &mut [Competition]) {
    competitions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(id: &str, name: &str, league_id: &str, created: Option<&str>) -> Competition {
        Competition {
            id: id.to_string(),
            name: name.to_string(),
            league_id: league_id.to_string(),
            sport: "cricket".to_string(),
            create_time: created.map(str::to_string),
        }
    }

    #[test]
    fn test_matches_term() {
        let c = comp("c1", "Office T20 Pool", "", None);
        assert!(c.matches_term("t20"));

        let c = comp("c2", "Friends", "mens-t20-world-cup-2026", None);
        assert!(c.matches_term("T20"));

        let c = comp("c3", "Premier League", "epl-2026", None);
        assert!(!c.matches_term("t20"));
    }

    #[test]
    fn test_sort_latest_first() {
        let mut comps = vec![
            comp("old", "a", "", Some("2025-12-01T00:00:00Z")),
            comp("none", "b", "", None),
            comp("new", "c", "", Some("2026-01-15T08:00:00.123456Z")),
        ];

        sort_latest_first(&mut comps);

        let ids: Vec<&str> = comps.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
    }
}
