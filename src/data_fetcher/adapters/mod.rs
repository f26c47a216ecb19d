//! Source adapters: one per upstream API.
//!
//! Each adapter owns its deadline and maps the provider payload into the
//! normalized records. Adapters never touch shared state.

pub mod codechef;
pub mod codeforces;
pub mod geeksforgeeks;
pub mod kontests;
pub mod leetcode;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::data_fetcher::api::fetch_utils::with_timeout;
use crate::data_fetcher::api::transport::Transport;
use crate::data_fetcher::models::{NormalizedCodingProfile, NormalizedContest, Platform};
use crate::error::AppError;

pub use codechef::{CodeChefContestAdapter, CodeChefProfileAdapter};
pub use codeforces::{
    CodeforcesContestAdapter, CodeforcesMirrorAdapter, CodeforcesProfileAdapter,
};
pub use geeksforgeeks::{GeeksforGeeksAuthAdapter, GeeksforGeeksProfileAdapter};
pub use kontests::KontestsAdapter;
pub use leetcode::{LeetCodeContestAdapter, LeetCodeProfileAdapter, LeetCodeStatsAdapter};

/// Transport, base URL and deadline handed to every adapter
#[derive(Clone)]
pub struct AdapterContext {
    pub transport: Arc<dyn Transport>,
    pub base_url: String,
    pub timeout: Duration,
}

impl AdapterContext {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// A source of contest listings
#[async_trait]
pub trait ContestAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn timeout(&self) -> Duration;

    /// Fetches and maps the listing without the adapter deadline
    async fn fetch_unbounded(&self) -> Result<Vec<NormalizedContest>, AppError>;

    /// Fetches and maps the listing, failing with `AdapterTimeout` once the
    /// deadline passes
    async fn fetch(&self) -> Result<Vec<NormalizedContest>, AppError> {
        with_timeout(self.name(), self.timeout(), self.fetch_unbounded()).await
    }
}

/// A source of coding-profile statistics for one platform
#[async_trait]
pub trait ProfileAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn platform(&self) -> Platform;

    fn timeout(&self) -> Duration;

    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError>;

    async fn fetch(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        with_timeout(self.name(), self.timeout(), self.fetch_unbounded(handle)).await
    }
}

/// Providers send numbers both as JSON numbers and as numeric strings
pub(crate) fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Rejects listings whose duration cannot belong to a real contest
pub(crate) fn plausible_duration(source: &str, name: &str, seconds: i64) -> bool {
    let plausible = NormalizedContest::is_plausible_duration(seconds);
    if !plausible {
        debug!("Skipping {} contest '{}' with duration {}s", source, name, seconds);
    }
    plausible
}

pub(crate) fn lenient_i64(value: &serde_json::Value) -> Option<i64> {
    lenient_number(value).map(|n| n.round() as i64)
}

pub(crate) fn lenient_u64(value: &serde_json::Value) -> Option<u64> {
    lenient_i64(value).and_then(|n| u64::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(lenient_i64(&json!(1500)), Some(1500));
        assert_eq!(lenient_i64(&json!("1499.6")), Some(1500));
        assert_eq!(lenient_i64(&json!(" 42 ")), Some(42));
        assert_eq!(lenient_i64(&json!(null)), None);
        assert_eq!(lenient_i64(&json!("n/a")), None);
        assert_eq!(lenient_u64(&json!(-3)), None);
        assert_eq!(lenient_u64(&json!("120")), Some(120));
    }

    #[test]
    fn test_plausible_duration() {
        assert!(plausible_duration("test", "Weekly", 5400));
        assert!(plausible_duration("test", "Long Challenge", 10 * 24 * 3600));
        assert!(!plausible_duration("test", "Broken", i64::MAX));
    }
}
