use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Match, MISSING};

/// How matches without a scheduled time take part in duplicate grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTimePolicy {
    /// Missing times compare equal, so same-pair matches without a time
    /// are reported together. Clusters found this way are flagged.
    #[default]
    Collide,
    /// A missing time never matches anything
    Separate,
}

#[derive(Error, Debug)]
#[error("unknown time policy `{0}` (expected `collide` or `separate`)")]
pub struct ParsePolicyError(String);

impl FromStr for UnknownTimePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collide" => Ok(UnknownTimePolicy::Collide),
            "separate" => Ok(UnknownTimePolicy::Separate),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Unordered team pair plus scheduled time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DuplicateKey {
    /// Lexicographically smaller team name
    pub team_a: String,
    /// Lexicographically larger team name
    pub team_b: String,
    /// `None` when the match has no scheduled time
    pub scheduled_time: Option<String>,
}

impl DuplicateKey {
    pub fn for_match(m: &Match) -> Self {
        let (team_a, team_b) = if m.team1 <= m.team2 {
            (m.team1.clone(), m.team2.clone())
        } else {
            (m.team2.clone(), m.team1.clone())
        };

        Self {
            team_a,
            team_b,
            scheduled_time: m.scheduled_time.clone(),
        }
    }
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {} at {}",
            self.team_a,
            self.team_b,
            self.scheduled_time.as_deref().unwrap_or(MISSING)
        )
    }
}

/// Two or more match documents sharing a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateCluster {
    pub key: DuplicateKey,
    /// Member document IDs in input order
    pub ids: Vec<String>,
}

impl DuplicateCluster {
    /// Whether the cluster was formed only because times were missing
    pub fn unknown_time(&self) -> bool {
        self.key.scheduled_time.is_none()
    }
}

/// Group matches by unordered team pair and time.
///
/// Clusters are returned in the order their key was first seen.
pub fn find_duplicates(matches: &[Match], policy: UnknownTimePolicy) -> Vec<DuplicateCluster> {
    let mut groups: Vec<DuplicateCluster> = Vec::new();
    let mut index: HashMap<DuplicateKey, usize> = HashMap::new();

    for m in matches {
        if m.scheduled_time.is_none() && policy == UnknownTimePolicy::Separate {
            debug!("Match {} has no scheduled time, not grouped", m.id);
            continue;
        }

        let key = DuplicateKey::for_match(m);
        match index.get(&key) {
            Some(&slot) => groups[slot].ids.push(m.id.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateCluster {
                    key,
                    ids: vec![m.id.clone()],
                });
            }
        }
    }

    groups.retain(|group| group.ids.len() > 1);
    groups
}

/// Occurrences of one `"team1 vs team2"` label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub label: String,
    pub count: usize,
}

/// Count matches per ordered team label, in first-seen order
pub fn tally_pairs(matches: &[Match]) -> Vec<PairCount> {
    let mut counts: Vec<PairCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let label = m.label();
        match index.get(&label) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(PairCount { label, count: 1 });
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: &str, team1: &str, team2: &str, time: Option<&str>) -> Match {
        Match {
            id: id.to_string(),
            team1: team1.to_string(),
            team2: team2.to_string(),
            scheduled_time: time.map(str::to_string),
            status: "upcoming".to_string(),
            actual_score: None,
            verified: false,
        }
    }

    #[test]
    fn test_swapped_teams_are_duplicates() {
        let matches = vec![
            fixture("a", "India", "Pakistan", Some("2026-01-01T10:00:00Z")),
            fixture("b", "Pakistan", "India", Some("2026-01-01T10:00:00Z")),
        ];

        let clusters = find_duplicates(&matches, UnknownTimePolicy::Collide);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].ids, vec!["a", "b"]);
        assert_eq!(clusters[0].key.team_a, "India");
        assert!(!clusters[0].unknown_time());
    }

    #[test]
    fn test_distinct_keys_have_no_clusters() {
        let matches = vec![
            fixture("a", "India", "Pakistan", Some("2026-01-01T10:00:00Z")),
            fixture("b", "India", "Pakistan", Some("2026-02-01T10:00:00Z")),
            fixture("c", "England", "West Indies", Some("2026-01-01T10:00:00Z")),
        ];

        assert!(find_duplicates(&matches, UnknownTimePolicy::Collide).is_empty());
    }

    #[test]
    fn test_clusters_follow_first_seen_order() {
        let matches = vec![
            fixture("e1", "England", "West Indies", Some("t2")),
            fixture("i1", "India", "Pakistan", Some("t1")),
            fixture("i2", "India", "Pakistan", Some("t1")),
            fixture("e2", "West Indies", "England", Some("t2")),
            fixture("e3", "England", "West Indies", Some("t2")),
        ];

        let clusters = find_duplicates(&matches, UnknownTimePolicy::Collide);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].ids, vec!["e1", "e2", "e3"]);
        assert_eq!(clusters[1].ids, vec!["i1", "i2"]);
    }

    #[test]
    fn test_unknown_time_policy() {
        let matches = vec![
            fixture("a", "India", "Pakistan", None),
            fixture("b", "Pakistan", "India", None),
        ];

        let collide = find_duplicates(&matches, UnknownTimePolicy::Collide);
        assert_eq!(collide.len(), 1);
        assert!(collide[0].unknown_time());
        assert_eq!(collide[0].key.to_string(), "India vs Pakistan at N/A");

        assert!(find_duplicates(&matches, UnknownTimePolicy::Separate).is_empty());
    }

    #[test]
    fn test_rerun_is_identical() {
        let matches = vec![
            fixture("a", "India", "Pakistan", Some("t")),
            fixture("b", "Pakistan", "India", Some("t")),
            fixture("c", "Nepal", "Oman", None),
        ];

        assert_eq!(
            find_duplicates(&matches, UnknownTimePolicy::Collide),
            find_duplicates(&matches, UnknownTimePolicy::Collide)
        );
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("Separate".parse::<UnknownTimePolicy>().unwrap(), UnknownTimePolicy::Separate);
        assert_eq!(" collide ".parse::<UnknownTimePolicy>().unwrap(), UnknownTimePolicy::Collide);
        assert!("fuzzy".parse::<UnknownTimePolicy>().is_err());
    }

    #[test]
    fn test_tally_pairs_keeps_team_order() {
        let matches = vec![
            fixture("a", "India", "Pakistan", Some("t")),
            fixture("b", "India", "Pakistan", Some("u")),
            fixture("c", "Pakistan", "India", Some("t")),
        ];

        let counts = tally_pairs(&matches);
        assert_eq!(
            counts,
            vec![
                PairCount { label: "India vs Pakistan".into(), count: 2 },
                PairCount { label: "Pakistan vs India".into(), count: 1 },
            ]
        );
    }
}
