//! LeetCode GraphQL (contests and profile) and the community stats mirror

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{AdapterContext, ContestAdapter, ProfileAdapter, plausible_duration};
use crate::data_fetcher::api::fetch_utils::{fetch_json, post_graphql};
use crate::data_fetcher::api::urls::{build_graphql_url, build_handle_url};
use crate::data_fetcher::models::{
    GlobalRank, NormalizedCodingProfile, NormalizedContest, Platform,
};
use crate::data_fetcher::processors::{from_unix_seconds, rank_tier, trend_from_history};
use crate::error::AppError;

const PROVIDER: &str = "leetcode";

const CONTESTS_QUERY: &str = "{ topTwoContests { title titleSlug startTime duration } }";

const PROFILE_QUERY: &str = r#"query userProfile($username: String!) {
  userContestRanking(username: $username) { attendedContestsCount rating globalRanking }
  userContestRankingHistory(username: $username) { attended rating }
  matchedUser(username: $username) { submitStats { acSubmissionNum { difficulty count } } }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContestsData {
    #[serde(default)]
    top_two_contests: Vec<LcContest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LcContest {
    title: String,
    title_slug: String,
    start_time: i64,
    #[serde(default)]
    duration: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileData {
    user_contest_ranking: Option<ContestRanking>,
    #[serde(default)]
    user_contest_ranking_history: Option<Vec<RankingHistoryEntry>>,
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContestRanking {
    #[serde(default)]
    attended_contests_count: u64,
    #[serde(default)]
    rating: f64,
    global_ranking: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RankingHistoryEntry {
    #[serde(default)]
    attended: bool,
    #[serde(default)]
    rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    #[serde(default)]
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
struct DifficultyCount {
    difficulty: String,
    #[serde(default)]
    count: u64,
}

/// Payload of the stats mirror
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    total_solved: u64,
    #[serde(default)]
    ranking: u64,
}

fn map_contest(contest: LcContest) -> Option<NormalizedContest> {
    let start = from_unix_seconds(contest.start_time)?;
    if !plausible_duration(LeetCodeContestAdapter::NAME, &contest.title, contest.duration) {
        return None;
    }
    Some(NormalizedContest::new(
        Platform::LeetCode,
        contest.title,
        start,
        contest.duration,
        format!("https://leetcode.com/contest/{}", contest.title_slug),
    ))
}

fn map_profile(handle: &str, data: ProfileData) -> Result<NormalizedCodingProfile, AppError> {
    let Some(user) = data.matched_user else {
        return Err(AppError::provider_status(
            PROVIDER,
            format!("user '{handle}' does not exist"),
        ));
    };

    let mut profile = NormalizedCodingProfile::new(Platform::LeetCode, handle);
    profile.problems_solved = user
        .submit_stats
        .ac_submission_num
        .iter()
        .find(|d| d.difficulty == "All")
        .map(|d| d.count)
        .unwrap_or(0);

    if let Some(ranking) = data.user_contest_ranking {
        profile.rating = ranking.rating.round() as i64;
        profile.contests_attended = ranking.attended_contests_count;
        profile.global_rank = ranking.global_ranking.map(GlobalRank::exact);
    }

    let attended: Vec<i64> = data
        .user_contest_ranking_history
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.attended)
        .map(|entry| entry.rating.round() as i64)
        .collect();
    profile.peak_rating = attended
        .iter()
        .copied()
        .max()
        .unwrap_or(profile.rating)
        .max(profile.rating);
    profile.trend = trend_from_history(&attended);
    profile.rank = rank_tier(Platform::LeetCode, profile.rating);

    Ok(profile)
}

pub struct LeetCodeContestAdapter {
    ctx: AdapterContext,
}

impl LeetCodeContestAdapter {
    pub const NAME: &'static str = "leetcode";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ContestAdapter for LeetCodeContestAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self) -> Result<Vec<NormalizedContest>, AppError> {
        let url = build_graphql_url(&self.ctx.base_url);
        let data: ContestsData =
            post_graphql(self.ctx.transport.as_ref(), &url, CONTESTS_QUERY, json!({})).await?;
        let contests: Vec<NormalizedContest> = data
            .top_two_contests
            .into_iter()
            .filter_map(map_contest)
            .collect();
        info!("LeetCode listed {} upcoming contests", contests.len());
        Ok(contests)
    }
}

pub struct LeetCodeProfileAdapter {
    ctx: AdapterContext,
}

impl LeetCodeProfileAdapter {
    pub const NAME: &'static str = "leetcode-profile";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for LeetCodeProfileAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let url = build_graphql_url(&self.ctx.base_url);
        let data: ProfileData = post_graphql(
            self.ctx.transport.as_ref(),
            &url,
            PROFILE_QUERY,
            json!({ "username": handle }),
        )
        .await?;
        let profile = map_profile(handle, data)?;
        debug!(
            "LeetCode profile {}: rating={}, solved={}",
            handle, profile.rating, profile.problems_solved
        );
        Ok(profile)
    }
}

/// Alternate LeetCode source. Carries solved count and ranking but no rating.
pub struct LeetCodeStatsAdapter {
    ctx: AdapterContext,
}

impl LeetCodeStatsAdapter {
    pub const NAME: &'static str = "leetcode-stats";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for LeetCodeStatsAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let url = build_handle_url(&self.ctx.base_url, handle);
        let stats: StatsResponse = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        if stats.status != "success" {
            return Err(AppError::provider_status(
                Self::NAME,
                stats.message.unwrap_or(stats.status),
            ));
        }

        let mut profile = NormalizedCodingProfile::new(Platform::LeetCode, handle);
        profile.problems_solved = stats.total_solved;
        profile.global_rank = (stats.ranking > 0).then(|| GlobalRank::exact(stats.ranking));
        Ok(profile)
    }
}
