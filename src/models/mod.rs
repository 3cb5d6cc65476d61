pub mod competition;
pub mod document;
pub mod field;
pub mod matches;
pub mod prediction;

pub use competition::Competition;
pub use document::{document_id, flatten, Document, FlatDocument, ListResponse, RunQueryItem, MISSING};
pub use field::FieldValue;
pub use matches::{Match, STATUS_FINISHED, STATUS_UPCOMING};
pub use prediction::Prediction;
