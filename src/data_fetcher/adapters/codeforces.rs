//! Codeforces official API: contest list, profile and the mirror host

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{AdapterContext, ContestAdapter, ProfileAdapter, plausible_duration};
use crate::data_fetcher::api::fetch_utils::fetch_json;
use crate::data_fetcher::api::transport::Transport;
use crate::data_fetcher::api::urls::{build_codeforces_contests_url, build_codeforces_user_url};
use crate::data_fetcher::models::{NormalizedCodingProfile, NormalizedContest, Platform};
use crate::data_fetcher::processors::{
    approximate_codeforces_global_rank, from_unix_seconds, rank_tier, trend_from_history,
};
use crate::error::AppError;

const PROVIDER: &str = "codeforces";

/// Every Codeforces API response: `status` is "OK" or "FAILED" with a comment
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    result: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self, url: &str) -> Result<T, AppError> {
        if self.status != "OK" {
            return Err(AppError::provider_status(
                PROVIDER,
                self.comment.unwrap_or(self.status),
            ));
        }
        self.result
            .ok_or_else(|| AppError::api_no_data("Codeforces response has no result", url))
    }
}

async fn fetch_result<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, AppError> {
    let envelope: Envelope<T> = fetch_json(transport, url).await?;
    envelope.into_result(url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfContest {
    id: u64,
    name: String,
    #[serde(default)]
    duration_seconds: i64,
    start_time_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfUser {
    handle: String,
    #[serde(default)]
    rating: i64,
    #[serde(default)]
    max_rating: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfRatingChange {
    new_rating: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfSubmission {
    problem: CfProblem,
    #[serde(default)]
    verdict: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfProblem {
    contest_id: Option<u64>,
    #[serde(default)]
    index: String,
    #[serde(default)]
    name: String,
}

fn map_contest(contest: CfContest) -> Option<NormalizedContest> {
    let start = contest.start_time_seconds.and_then(from_unix_seconds)?;
    if !plausible_duration(
        CodeforcesContestAdapter::NAME,
        &contest.name,
        contest.duration_seconds,
    ) {
        return None;
    }
    Some(NormalizedContest::new(
        Platform::CodeForces,
        contest.name,
        start,
        contest.duration_seconds,
        format!("https://codeforces.com/contests/{}", contest.id),
    ))
}

/// Problems with at least one accepted submission, counted once each
fn count_solved(submissions: &[CfSubmission]) -> u64 {
    let solved: HashSet<(Option<u64>, &str, &str)> = submissions
        .iter()
        .filter(|s| s.verdict.as_deref() == Some("OK"))
        .map(|s| {
            (
                s.problem.contest_id,
                s.problem.index.as_str(),
                s.problem.name.as_str(),
            )
        })
        .collect();
    solved.len() as u64
}

/// Profile from `user.info` alone, shared by the primary and mirror adapters
fn profile_from_user(user: &CfUser) -> NormalizedCodingProfile {
    let mut profile = NormalizedCodingProfile::new(Platform::CodeForces, user.handle.clone());
    profile.rating = user.rating;
    profile.peak_rating = user.max_rating.max(user.rating);
    profile.rank = rank_tier(Platform::CodeForces, user.rating);
    profile.global_rank = approximate_codeforces_global_rank(user.rating);
    profile
}

async fn fetch_user(transport: &dyn Transport, base: &str, handle: &str) -> Result<CfUser, AppError> {
    let url = build_codeforces_user_url(base, "user.info", handle);
    let users: Vec<CfUser> = fetch_result(transport, &url).await?;
    users
        .into_iter()
        .next()
        .ok_or_else(|| AppError::api_no_data(format!("No Codeforces user '{handle}'"), url))
}

pub struct CodeforcesContestAdapter {
    ctx: AdapterContext,
}

impl CodeforcesContestAdapter {
    pub const NAME: &'static str = "codeforces";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ContestAdapter for CodeforcesContestAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self) -> Result<Vec<NormalizedContest>, AppError> {
        let url = build_codeforces_contests_url(&self.ctx.base_url);
        let contests: Vec<CfContest> = fetch_result(self.ctx.transport.as_ref(), &url).await?;
        let total = contests.len();
        let mapped: Vec<NormalizedContest> = contests.into_iter().filter_map(map_contest).collect();
        info!("Codeforces listed {} contests, {} mapped", total, mapped.len());
        Ok(mapped)
    }
}

/// Primary Codeforces profile: `user.info`, `user.rating` and `user.status`
/// fetched concurrently. Only `user.info` is required.
pub struct CodeforcesProfileAdapter {
    ctx: AdapterContext,
}

impl CodeforcesProfileAdapter {
    pub const NAME: &'static str = "codeforces-profile";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for CodeforcesProfileAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::CodeForces
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let transport = self.ctx.transport.as_ref();
        let base = self.ctx.base_url.as_str();
        let rating_url = build_codeforces_user_url(base, "user.rating", handle);
        let status_url = build_codeforces_user_url(base, "user.status", handle);

        let (user, history, submissions) = tokio::join!(
            fetch_user(transport, base, handle),
            fetch_result::<Vec<CfRatingChange>>(transport, &rating_url),
            fetch_result::<Vec<CfSubmission>>(transport, &status_url),
        );

        let user = user?;
        let mut profile = profile_from_user(&user);

        match history {
            Ok(history) => {
                let ratings: Vec<i64> = history.iter().map(|c| c.new_rating).collect();
                profile.contests_attended = ratings.len() as u64;
                profile.trend = trend_from_history(&ratings);
                if let Some(best) = ratings.iter().copied().max() {
                    profile.peak_rating = profile.peak_rating.max(best);
                }
            }
            Err(e) => warn!("Codeforces rating history unavailable for {}: {}", handle, e),
        }

        match submissions {
            Ok(submissions) => profile.problems_solved = count_solved(&submissions),
            Err(e) => warn!("Codeforces submissions unavailable for {}: {}", handle, e),
        }

        debug!(
            "Codeforces profile {}: rating={}, solved={}",
            profile.handle, profile.rating, profile.problems_solved
        );
        Ok(profile)
    }
}

/// Alternate Codeforces source: `user.info` on the mirror host
pub struct CodeforcesMirrorAdapter {
    ctx: AdapterContext,
}

impl CodeforcesMirrorAdapter {
    pub const NAME: &'static str = "codeforces-mirror";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for CodeforcesMirrorAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::CodeForces
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let user = fetch_user(self.ctx.transport.as_ref(), &self.ctx.base_url, handle).await?;
        Ok(profile_from_user(&user))
    }
}
