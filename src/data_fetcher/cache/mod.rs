pub mod file;
pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use file::FileSnapshotCache;
pub use memory::MemorySnapshotCache;
pub use types::{CachedSnapshot, snapshot_key};

/// Store for last-known-good profile snapshots.
///
/// Implementations never fail outward: read problems are a miss and write
/// problems are logged. Writes are last-writer-wins.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedSnapshot>;
    async fn put(&self, key: &str, snapshot: CachedSnapshot);
}
