pub mod firestore;
pub mod query;
pub mod snapshot;
pub mod source;

pub use firestore::FirestoreClient;
pub use query::StructuredQuery;
pub use snapshot::SnapshotSource;
pub use source::DocumentSource;
