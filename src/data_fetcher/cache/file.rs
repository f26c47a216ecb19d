//! Snapshot cache persisted as a JSON file
//!
//! This is the local persistent store that survives between runs. The whole
//! map is read on every access and rewritten on every put; it holds one entry
//! per (platform, handle), so it stays small.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::SnapshotCache;
use super::types::CachedSnapshot;
use crate::error::AppError;

type SnapshotMap = BTreeMap<String, CachedSnapshot>;

pub struct FileSnapshotCache {
    path: PathBuf,
    // Serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl FileSnapshotCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the snapshot map. A missing file is an empty map.
    pub async fn load(&self) -> Result<SnapshotMap, AppError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(SnapshotMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SnapshotMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, map: &SnapshotMap) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        // Write to a sibling temp file and rename so readers never see a torn file
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(map)?;
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn try_put(&self, key: &str, snapshot: CachedSnapshot) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut map = match self.load().await {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Snapshot file {} unreadable, starting a new one: {}",
                    self.path.display(),
                    e
                );
                SnapshotMap::new()
            }
        };
        map.insert(key.to_string(), snapshot);
        self.store(&map).await
    }
}

#[async_trait]
impl SnapshotCache for FileSnapshotCache {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Option<CachedSnapshot> {
        match self.load().await {
            Ok(mut map) => {
                let hit = map.remove(key);
                debug!("Snapshot file lookup: key={}, hit={}", key, hit.is_some());
                hit
            }
            Err(e) => {
                warn!("Failed to read snapshot file: {}", e);
                None
            }
        }
    }

    #[instrument(skip(self, snapshot))]
    async fn put(&self, key: &str, snapshot: CachedSnapshot) {
        if let Err(e) = self.try_put(key, snapshot).await {
            warn!("Failed to persist snapshot for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::{NormalizedCodingProfile, Platform};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn snapshot(rating: i64) -> CachedSnapshot {
        let mut profile = NormalizedCodingProfile::new(Platform::CodeChef, "chef");
        profile.rating = rating;
        CachedSnapshot::new(profile, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let cache = FileSnapshotCache::new(dir.path().join("snapshots.json"));
        assert!(cache.get("codechef:chef").await.is_none());
        assert!(cache.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshots.json");

        FileSnapshotCache::new(&path)
            .put("codechef:chef", snapshot(1820))
            .await;
        assert!(path.exists());

        let reopened = FileSnapshotCache::new(&path);
        let hit = reopened.get("codechef:chef").await.unwrap();
        assert_eq!(hit, snapshot(1820));
    }

    #[tokio::test]
    async fn test_put_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let cache = FileSnapshotCache::new(dir.path().join("snapshots.json"));
        cache.put("codechef:chef", snapshot(1700)).await;
        cache.put("codechef:other", snapshot(1500)).await;
        cache.put("codechef:chef", snapshot(1750)).await;

        let map = cache.load().await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["codechef:chef"].profile.rating, 1750);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_miss_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshots.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let cache = FileSnapshotCache::new(&path);
        assert!(cache.get("codechef:chef").await.is_none());

        cache.put("codechef:chef", snapshot(1600)).await;
        assert_eq!(cache.get("codechef:chef").await.unwrap().profile.rating, 1600);
    }
}
