//! Service layer: backend synchronization and the shared snapshot.

pub mod coordinator;
pub mod snapshot;

pub use coordinator::Coordinator;
pub use snapshot::{SnapshotStore, Versioned};
