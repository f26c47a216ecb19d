//! In-memory snapshot cache backed by an LRU

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::SnapshotCache;
use super::types::CachedSnapshot;
use crate::constants::snapshots;

/// Process-local snapshot store. Evicts the least recently used key once
/// the capacity is reached.
pub struct MemorySnapshotCache {
    entries: RwLock<LruCache<String, CachedSnapshot>>,
}

impl MemorySnapshotCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for MemorySnapshotCache {
    fn default() -> Self {
        Self::new(snapshots::MEMORY_CAPACITY)
    }
}

#[async_trait]
impl SnapshotCache for MemorySnapshotCache {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Option<CachedSnapshot> {
        // LruCache::get updates recency, so this needs the write lock
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(snapshot) => {
                debug!("Snapshot cache hit: key={}", key);
                Some(snapshot.clone())
            }
            None => {
                debug!("Snapshot cache miss: key={}", key);
                None
            }
        }
    }

    #[instrument(skip(self, snapshot))]
    async fn put(&self, key: &str, snapshot: CachedSnapshot) {
        debug!(
            "Storing snapshot: key={}, captured_at={}",
            key, snapshot.captured_at
        );
        self.entries.write().await.put(key.to_string(), snapshot);
    }
}
