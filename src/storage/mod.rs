pub mod memory;
pub mod persistence;
pub mod table;

pub use memory::{DeletePolicy, InMemoryStorage};
pub use persistence::{DatabaseSnapshot, SnapshotError, SnapshotManager};
pub use table::Table;
