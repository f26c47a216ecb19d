//! kontests.net: an aggregator covering most judges in one listing

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{AdapterContext, ContestAdapter, lenient_number, plausible_duration};
use crate::data_fetcher::api::fetch_utils::fetch_json;
use crate::data_fetcher::api::urls::build_kontests_url;
use crate::data_fetcher::models::NormalizedContest;
use crate::data_fetcher::processors::{canonicalize_platform, parse_provider_timestamp};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct KontestsEntry {
    name: String,
    #[serde(default)]
    url: String,
    start_time: String,
    #[serde(default)]
    end_time: String,
    #[serde(default)]
    duration: serde_json::Value,
    #[serde(default)]
    site: String,
}

pub struct KontestsAdapter {
    ctx: AdapterContext,
}

impl KontestsAdapter {
    pub const NAME: &'static str = "kontests";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

/// Maps one listing entry. Entries from unknown sites or with an unreadable
/// start time are skipped.
fn map_entry(entry: KontestsEntry) -> Option<NormalizedContest> {
    let Some(platform) = canonicalize_platform(&entry.site) else {
        debug!("Skipping kontests entry from unknown site '{}'", entry.site);
        return None;
    };
    let Some(start) = parse_provider_timestamp(&entry.start_time) else {
        debug!(
            "Skipping kontests entry '{}' with start time '{}'",
            entry.name, entry.start_time
        );
        return None;
    };
    let end = parse_provider_timestamp(&entry.end_time);

    let duration = lenient_number(&entry.duration)
        .filter(|secs| *secs >= 0.0)
        .map(|secs| secs as i64)
        .or_else(|| end.map(|end| (end - start).num_seconds()))
        .unwrap_or(0);
    if !plausible_duration(KontestsAdapter::NAME, &entry.name, duration) {
        return None;
    }

    Some(NormalizedContest::new(
        platform, entry.name, start, duration, entry.url,
    ))
}

#[async_trait]
impl ContestAdapter for KontestsAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self) -> Result<Vec<NormalizedContest>, AppError> {
        let url = build_kontests_url(&self.ctx.base_url);
        let entries: Vec<KontestsEntry> = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        let total = entries.len();
        let contests: Vec<NormalizedContest> = entries.into_iter().filter_map(map_entry).collect();
        info!(
            "kontests returned {} entries, {} mapped",
            total,
            contests.len()
        );
        Ok(contests)
    }
}
