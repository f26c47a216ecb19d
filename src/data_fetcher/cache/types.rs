//! Snapshot data structures with TTL support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::data_fetcher::models::{NormalizedCodingProfile, Platform};

/// A profile as last fetched successfully, with the time it was captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub profile: NormalizedCodingProfile,
    pub captured_at: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn new(profile: NormalizedCodingProfile, captured_at: DateTime<Utc>) -> Self {
        Self {
            profile,
            captured_at,
        }
    }

    /// Age of the snapshot at `now`. Snapshots stamped in the future count as age zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.captured_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Fresh means strictly younger than the TTL
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = self.age(now);
        let fresh = age < ttl;
        debug!(
            "Snapshot freshness check: platform={}, age={:?}, ttl={:?}, fresh={}",
            self.profile.platform, age, ttl, fresh
        );
        fresh
    }
}

/// Cache key for a user's profile on one platform. Handles are
/// case-insensitive on every supported platform.
pub fn snapshot_key(platform: Platform, handle: &str) -> String {
    format!("{}:{}", platform.slug(), handle.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot_at(captured_at: DateTime<Utc>) -> CachedSnapshot {
        CachedSnapshot::new(
            NormalizedCodingProfile::new(Platform::CodeForces, "tourist"),
            captured_at,
        )
    }

    #[test]
    fn test_fresh_within_ttl() {
        let captured = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = snapshot_at(captured);
        let ttl = Duration::from_secs(3600);

        assert!(snapshot.is_fresh(captured + chrono::Duration::minutes(30), ttl));
        assert!(!snapshot.is_fresh(captured + chrono::Duration::hours(1), ttl));
        assert!(!snapshot.is_fresh(captured + chrono::Duration::hours(5), ttl));
    }

    #[test]
    fn test_future_capture_counts_as_fresh() {
        let captured = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = snapshot_at(captured);
        let now = captured - chrono::Duration::minutes(5);
        assert_eq!(snapshot.age(now), Duration::ZERO);
        assert!(snapshot.is_fresh(now, Duration::from_secs(1)));
    }

    #[test]
    fn test_snapshot_key_normalizes_handle() {
        assert_eq!(
            snapshot_key(Platform::LeetCode, " SomeUser "),
            "leetcode:someuser"
        );
    }
}
