use serde::Serialize;

use super::document::FlatDocument;
use super::field::FieldValue;

/// Status value for matches that have not started
pub const STATUS_UPCOMING: &str = "upcoming";

/// Status value for completed matches
pub const STATUS_FINISHED: &str = "finished";

/// A fixture stored under `competitions/{id}/matches` or `official_leagues/{id}/matches`
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    /// Document ID
    pub id: String,

    /// First team name, `"N/A"` when absent
    pub team1: String,

    /// Second team name, `"N/A"` when absent
    pub team2: String,

    /// Scheduled kickoff as stored, `None` when absent
    pub scheduled_time: Option<String>,

    /// Status tag, `"N/A"` when absent
    pub status: String,

    /// Score map; `None` when absent or explicitly null
    pub actual_score: Option<FieldValue>,

    /// `actualScore.verified`, `false` when absent
    pub verified: bool,
}

impl Match {
    pub fn from_document(doc: &FlatDocument) -> Self {
        Self {
            id: doc.id.clone(),
            team1: doc.text("team1Name").to_string(),
            team2: doc.text("team2Name").to_string(),
            scheduled_time: doc
                .get("scheduledTime")
                .and_then(FieldValue::as_text)
                .map(str::to_string),
            status: doc.text("status").to_string(),
            actual_score: doc
                .get("actualScore")
                .filter(|score| !score.is_null())
                .cloned(),
            verified: doc.flag("actualScore.verified"),
        }
    }

    /// Scheduled time, or `"N/A"`
    pub fn time_label(&self) -> &str {
        self.scheduled_time.as_deref().unwrap_or(super::MISSING)
    }

    /// `"{team1} vs {team2}"` in stored order
    pub fn label(&self) -> String {
        format!("{} vs {}", self.team1, self.team2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{flatten, Document};
    use serde_json::json;

    fn match_from(value: serde_json::Value) -> Match {
        let doc: Document = serde_json::from_value(value).unwrap();
        Match::from_document(&flatten(&doc))
    }

    #[test]
    fn test_full_match() {
        let m = match_from(json!({
            "name": "competitions/c1/matches/m1",
            "fields": {
                "team1Name": {"stringValue": "England"},
                "team2Name": {"stringValue": "West Indies"},
                "scheduledTime": {"timestampValue": "2026-02-20T09:30:00Z"},
                "status": {"stringValue": "finished"},
                "actualScore": {"mapValue": {"fields": {"verified": {"booleanValue": true}}}}
            }
        }));

        assert_eq!(m.id, "m1");
        assert_eq!(m.label(), "England vs West Indies");
        assert_eq!(m.time_label(), "2026-02-20T09:30:00Z");
        assert_eq!(m.status, STATUS_FINISHED);
        assert!(m.actual_score.is_some());
        assert!(m.verified);
    }

    #[test]
    fn test_empty_match() {
        let m = match_from(json!({"name": "competitions/c1/matches/m2"}));

        assert_eq!(m.label(), "N/A vs N/A");
        assert_eq!(m.time_label(), "N/A");
        assert_eq!(m.status, "N/A");
        assert!(m.actual_score.is_none());
        assert!(!m.verified);
    }

    #[test]
    fn test_null_score_is_none() {
        let m = match_from(json!({
            "name": "m3",
            "fields": {"actualScore": {"nullValue": null}}
        }));

        assert!(m.actual_score.is_none());
    }
}
