use std::collections::HashSet;

use serde::Serialize;

use crate::models::Prediction;

/// Outcome of checking prediction match references against existing matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanReport {
    /// Predictions whose match still exists
    pub valid: usize,
    /// Predictions pointing at a missing match
    pub orphaned: usize,
    /// Distinct dangling match IDs, in the order first encountered
    pub orphaned_ids: Vec<String>,
    /// Predictions ignored because they belong to another competition
    pub skipped: usize,
}

impl OrphanReport {
    pub fn unique_orphaned(&self) -> usize {
        self.orphaned_ids.len()
    }

    /// First `limit` distinct orphaned IDs
    pub fn sample(&self, limit: usize) -> &[String] {
        &self.orphaned_ids[..limit.min(self.orphaned_ids.len())]
    }
}

/// Count predictions whose `matchId` is (or is not) in `valid_match_ids`.
///
/// When `competition_id` is given, predictions for other competitions are
/// skipped, so a server-filtered query and a full listing give the same
/// counts.
pub fn audit_predictions(
    valid_match_ids: &HashSet<String>,
    predictions: &[Prediction],
    competition_id: Option<&str>,
) -> OrphanReport {
    let mut report = OrphanReport::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for prediction in predictions {
        if let Some(competition_id) = competition_id {
            if prediction.competition_id != competition_id {
                report.skipped += 1;
                continue;
            }
        }

        if valid_match_ids.contains(&prediction.match_id) {
            report.valid += 1;
        } else {
            report.orphaned += 1;
            if seen.insert(prediction.match_id.as_str()) {
                report.orphaned_ids.push(prediction.match_id.clone());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(id: &str, match_id: &str, competition_id: &str) -> Prediction {
        Prediction {
            id: id.to_string(),
            match_id: match_id.to_string(),
            competition_id: competition_id.to_string(),
        }
    }

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_orphan_counts() {
        let predictions = vec![
            prediction("p1", "m1", "c1"),
            prediction("p2", "m3", "c1"),
            prediction("p3", "m3", "c1"),
        ];

        let report = audit_predictions(&ids(&["m1", "m2"]), &predictions, None);
        assert_eq!(report.valid, 1);
        assert_eq!(report.orphaned, 2);
        assert_eq!(report.orphaned_ids, vec!["m3"]);
        assert_eq!(report.unique_orphaned(), 1);
    }

    #[test]
    fn test_competition_filter() {
        let predictions = vec![
            prediction("p1", "m1", "c1"),
            prediction("p2", "m9", "other"),
            prediction("p3", "m4", "c1"),
        ];

        let report = audit_predictions(&ids(&["m1"]), &predictions, Some("c1"));
        assert_eq!(report.valid, 1);
        assert_eq!(report.orphaned, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.orphaned_ids, vec!["m4"]);
    }

    #[test]
    fn test_sample_is_bounded_and_ordered() {
        let predictions: Vec<Prediction> = (0..15)
            .map(|i| prediction(&format!("p{i}"), &format!("gone{i}"), "c1"))
            .collect();

        let report = audit_predictions(&HashSet::new(), &predictions, Some("c1"));
        assert_eq!(report.unique_orphaned(), 15);
        assert_eq!(report.sample(10).len(), 10);
        assert_eq!(report.sample(10)[0], "gone0");
        assert_eq!(report.sample(100).len(), 15);
    }

    #[test]
    fn test_missing_match_id_is_orphaned() {
        let predictions = vec![prediction("p1", "N/A", "c1")];

        let report = audit_predictions(&ids(&["m1"]), &predictions, Some("c1"));
        assert_eq!(report.orphaned, 1);
        assert_eq!(report.orphaned_ids, vec!["N/A"]);
    }
}
