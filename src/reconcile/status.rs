use crate::models::{Match, STATUS_UPCOMING};

/// A match counts once its status moved past upcoming or a score exists,
/// whichever is seen first.
pub fn is_non_upcoming(m: &Match) -> bool {
    m.status != STATUS_UPCOMING || m.actual_score.is_some()
}

pub fn count_non_upcoming(matches: &[Match]) -> usize {
    matches.iter().filter(|m| is_non_upcoming(m)).count()
}
