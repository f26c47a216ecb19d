//! CodeChef contest list and the community profile API

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{
    AdapterContext, ContestAdapter, ProfileAdapter, lenient_i64, lenient_number, lenient_u64,
    plausible_duration,
};
use crate::data_fetcher::api::fetch_utils::fetch_json;
use crate::data_fetcher::api::urls::{build_codechef_contests_url, build_codechef_profile_url};
use crate::data_fetcher::models::{
    GlobalRank, NormalizedCodingProfile, NormalizedContest, Platform,
};
use crate::data_fetcher::processors::{parse_provider_timestamp, rank_tier, trend_from_history};
use crate::error::AppError;

const PROVIDER: &str = "codechef";

#[derive(Debug, Deserialize)]
struct ContestListResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    present_contests: Vec<CcContest>,
    #[serde(default)]
    future_contests: Vec<CcContest>,
}

#[derive(Debug, Deserialize)]
struct CcContest {
    contest_code: String,
    contest_name: String,
    contest_start_date_iso: String,
    #[serde(default)]
    contest_end_date_iso: String,
    /// Minutes, as a string or a number
    #[serde(default)]
    contest_duration: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    success: bool,
    #[serde(default)]
    current_rating: serde_json::Value,
    #[serde(default)]
    highest_rating: serde_json::Value,
    #[serde(default)]
    global_rank: serde_json::Value,
    #[serde(default)]
    rating_data: Vec<RatingEntry>,
}

#[derive(Debug, Deserialize)]
struct RatingEntry {
    #[serde(default)]
    rating: serde_json::Value,
}

fn map_contest(contest: CcContest) -> Option<NormalizedContest> {
    let Some(start) = parse_provider_timestamp(&contest.contest_start_date_iso) else {
        debug!(
            "Skipping CodeChef contest {} with start '{}'",
            contest.contest_code, contest.contest_start_date_iso
        );
        return None;
    };
    let end = parse_provider_timestamp(&contest.contest_end_date_iso);
    let duration = lenient_number(&contest.contest_duration)
        .filter(|minutes| *minutes >= 0.0)
        .map(|minutes| (minutes * 60.0) as i64)
        .or_else(|| end.map(|end| (end - start).num_seconds()))
        .unwrap_or(0);
    if !plausible_duration(CodeChefContestAdapter::NAME, &contest.contest_name, duration) {
        return None;
    }

    Some(NormalizedContest::new(
        Platform::CodeChef,
        contest.contest_name,
        start,
        duration,
        format!("https://www.codechef.com/{}", contest.contest_code),
    ))
}

pub struct CodeChefContestAdapter {
    ctx: AdapterContext,
}

impl CodeChefContestAdapter {
    pub const NAME: &'static str = "codechef";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ContestAdapter for CodeChefContestAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self) -> Result<Vec<NormalizedContest>, AppError> {
        let url = build_codechef_contests_url(&self.ctx.base_url);
        let response: ContestListResponse = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        if response.status != "success" {
            return Err(AppError::provider_status(
                PROVIDER,
                response.message.unwrap_or(response.status),
            ));
        }

        let contests: Vec<NormalizedContest> = response
            .present_contests
            .into_iter()
            .chain(response.future_contests)
            .filter_map(map_contest)
            .collect();
        info!("CodeChef listed {} present and future contests", contests.len());
        Ok(contests)
    }
}

/// CodeChef profile from the community stats API. There is no alternate.
pub struct CodeChefProfileAdapter {
    ctx: AdapterContext,
}

impl CodeChefProfileAdapter {
    pub const NAME: &'static str = "codechef-profile";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for CodeChefProfileAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::CodeChef
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let url = build_codechef_profile_url(&self.ctx.base_url, handle);
        let response: ProfileResponse = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        if !response.success {
            return Err(AppError::provider_status(
                PROVIDER,
                format!("no profile for '{handle}'"),
            ));
        }

        let history: Vec<i64> = response
            .rating_data
            .iter()
            .filter_map(|entry| lenient_i64(&entry.rating))
            .collect();

        let mut profile = NormalizedCodingProfile::new(Platform::CodeChef, handle);
        profile.rating = lenient_i64(&response.current_rating).unwrap_or(0);
        profile.peak_rating = lenient_i64(&response.highest_rating)
            .unwrap_or(0)
            .max(profile.rating);
        profile.rank = rank_tier(Platform::CodeChef, profile.rating);
        profile.contests_attended = response.rating_data.len() as u64;
        profile.trend = trend_from_history(&history);
        profile.global_rank = lenient_u64(&response.global_rank)
            .filter(|rank| *rank > 0)
            .map(GlobalRank::exact);

        debug!(
            "CodeChef profile {}: rating={}, contests={}",
            handle, profile.rating, profile.contests_attended
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::TrendDirection;
    use crate::testing_utils::{FakeReply, FakeTransport};
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "https://cc.test";

    fn ctx(transport: FakeTransport) -> AdapterContext {
        AdapterContext::new(Arc::new(transport), BASE, Duration::from_secs(1))
    }

    fn list_url() -> String {
        format!("{BASE}/api/list/contests/all?sort_by=START&sorting_order=asc&offset=0&mode=all")
    }

    #[tokio::test]
    async fn test_contests_from_present_and_future() {
        let transport = FakeTransport::new().reply(
            list_url(),
            FakeReply::json(json!({
                "status": "success",
                "present_contests": [
                    {"contest_code": "START130", "contest_name": "Starters 130",
                     "contest_start_date_iso": "2024-04-17T20:00:00+05:30",
                     "contest_end_date_iso": "2024-04-17T22:00:00+05:30",
                     "contest_duration": "120"}
                ],
                "future_contests": [
                    {"contest_code": "START131", "contest_name": "Starters 131",
                     "contest_start_date_iso": "2024-04-24T20:00:00+05:30",
                     "contest_end_date_iso": "2024-04-24T23:00:00+05:30"}
                ],
                "past_contests": []
            })),
        );

        let contests = CodeChefContestAdapter::new(ctx(transport))
            .fetch()
            .await
            .unwrap();

        assert_eq!(contests.len(), 2);
        assert_eq!(contests[0].url, "https://www.codechef.com/START130");
        assert_eq!(contests[0].duration_seconds, 7200);
        assert_eq!(contests[0].start.to_rfc3339(), "2024-04-17T14:30:00+00:00");
        assert_eq!(contests[1].duration_seconds, 10800);
    }

    #[tokio::test]
    async fn test_contest_status_flag_is_error() {
        let transport = FakeTransport::new().reply(
            list_url(),
            FakeReply::json(json!({"status": "failure", "message": "maintenance"})),
        );
        let err = CodeChefContestAdapter::new(ctx(transport))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProviderStatus { .. }));
    }

    #[tokio::test]
    async fn test_profile_mapping() {
        let transport = FakeTransport::new().reply(
            format!("{BASE}/handle/chef"),
            FakeReply::json(json!({
                "success": true,
                "currentRating": 1812,
                "highestRating": "1900",
                "globalRank": "4521",
                "stars": "4★",
                "ratingData": [{"rating": "1650"}, {"rating": "1780"}, {"rating": "1812"}]
            })),
        );

        let profile = CodeChefProfileAdapter::new(ctx(transport))
            .fetch("chef")
            .await
            .unwrap();

        assert_eq!(profile.rating, 1812);
        assert_eq!(profile.peak_rating, 1900);
        assert_eq!(profile.rank, "4★");
        assert_eq!(profile.contests_attended, 3);
        assert_eq!(profile.global_rank, Some(GlobalRank::exact(4521)));
        assert_eq!(profile.trend.direction, TrendDirection::Up);
        assert_eq!(profile.trend.delta, 32);
    }

    #[tokio::test]
    async fn test_profile_success_false_is_error() {
        let transport = FakeTransport::new().reply(
            format!("{BASE}/handle/ghost"),
            FakeReply::json(json!({"success": false})),
        );
        let err = CodeChefProfileAdapter::new(ctx(transport))
            .fetch("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProviderStatus { .. }));
    }
}
