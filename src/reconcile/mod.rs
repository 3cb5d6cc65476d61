pub mod duplicates;
pub mod orphans;
pub mod status;

pub use duplicates::{
    find_duplicates, tally_pairs, DuplicateCluster, DuplicateKey, PairCount, UnknownTimePolicy,
};
pub use orphans::{audit_predictions, OrphanReport};
pub use status::{count_non_upcoming, is_non_upcoming};
