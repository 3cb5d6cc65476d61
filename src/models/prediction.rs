use serde::Serialize;

use super::document::FlatDocument;

/// A user prediction pointing at a match and competition by ID
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub id: String,
    /// Referenced match ID, `"N/A"` when absent
    pub match_id: String,
    /// Referenced competition ID, `"N/A"` when absent
    pub competition_id: String,
}

impl Prediction {
    pub fn from_document(doc: &FlatDocument) -> Self {
        Self {
            id: doc.id.clone(),
            match_id: doc.text("matchId").to_string(),
            competition_id: doc.text("competitionId").to_string(),
        }
    }
}
