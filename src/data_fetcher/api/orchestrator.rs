// src/data_fetcher/api/orchestrator.rs - Contest aggregation across every contest source

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::http_client::create_http_client_with_timeout;
use super::transport::{ReqwestTransport, Transport};
use crate::config::Config;
use crate::data_fetcher::adapters::{
    AdapterContext, CodeChefContestAdapter, CodeforcesContestAdapter, ContestAdapter,
    KontestsAdapter, LeetCodeContestAdapter,
};
use crate::data_fetcher::fallback::ensure_minimum;
use crate::data_fetcher::models::{ContestPhase, NormalizedContest, Platform, RecurringContest};
use crate::data_fetcher::processors::merge_contests;
use crate::error::AppError;

/// How one source fared in an aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Succeeded { records: usize },
    TimedOut,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn from_result<T>(source: &str, result: &Result<Vec<T>, AppError>) -> Self {
        let status = match result {
            Ok(records) => SourceStatus::Succeeded {
                records: records.len(),
            },
            Err(e) if e.is_timeout() => SourceStatus::TimedOut,
            Err(e) => SourceStatus::Failed {
                reason: e.to_string(),
            },
        };
        Self {
            source: source.to_string(),
            status,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, SourceStatus::Succeeded { .. })
    }
}

/// Contests ending before `earliest_end` were dropped as no longer relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelevanceWindow {
    pub earliest_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub days: i64,
}

impl RelevanceWindow {
    /// Window covering the last `days` days. Out-of-range spans reach back
    /// to the earliest representable time.
    pub fn ending_at(now: DateTime<Utc>, days: i64) -> Self {
        let earliest_end = Duration::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            earliest_end,
            generated_at: now,
            days,
        }
    }

    pub fn contains(&self, contest: &NormalizedContest) -> bool {
        contest.end >= self.earliest_end
    }
}

/// The consolidated contest response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestAggregate {
    pub contests: Vec<NormalizedContest>,
    /// Sources that answered successfully, in priority order
    pub sources: Vec<String>,
    pub reports: Vec<SourceReport>,
    pub window: RelevanceWindow,
    pub fallback_applied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContestSettings {
    pub min_count: usize,
    pub window_days: i64,
    pub required_platforms: Vec<Platform>,
    pub templates: Vec<RecurringContest>,
    /// Drop finished contests before the minimum-count check
    pub upcoming_only: bool,
}

impl ContestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_count: config.aggregation.min_contest_count,
            window_days: config.aggregation.relevance_window_days,
            required_platforms: config.aggregation.required_platforms.clone(),
            templates: config.recurring_templates(),
            upcoming_only: false,
        }
    }
}

impl Default for ContestSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Fans out to every contest source and folds the answers into one response.
///
/// Adapter order is merge priority: the first source to report a contest
/// keeps it.
pub struct ContestAggregator {
    adapters: Vec<Box<dyn ContestAdapter>>,
    settings: ContestSettings,
}

impl ContestAggregator {
    pub fn new(adapters: Vec<Box<dyn ContestAdapter>>, settings: ContestSettings) -> Self {
        Self { adapters, settings }
    }

    /// Standard source set in priority order: kontests, Codeforces, LeetCode, CodeChef
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let timeout = config.timeouts.contest();
        let endpoints = &config.endpoints;
        let ctx = |base: &str| AdapterContext::new(transport.clone(), base, timeout);

        let adapters: Vec<Box<dyn ContestAdapter>> = vec![
            Box::new(KontestsAdapter::new(ctx(&endpoints.kontests))),
            Box::new(CodeforcesContestAdapter::new(ctx(&endpoints.codeforces))),
            Box::new(LeetCodeContestAdapter::new(ctx(&endpoints.leetcode))),
            Box::new(CodeChefContestAdapter::new(ctx(&endpoints.codechef))),
        ];
        Self::new(adapters, ContestSettings::from_config(config))
    }

    /// Keep only running and upcoming contests. The fallback then tops up
    /// the filtered set, so the result stays non-empty.
    pub fn with_upcoming_only(mut self, upcoming_only: bool) -> Self {
        self.settings.upcoming_only = upcoming_only;
        self
    }

    /// Runs one aggregation. Never fails: source errors end up in `reports`
    /// and a shortfall is covered by synthesized contests.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, now: DateTime<Utc>) -> ContestAggregate {
        info!("Dispatching {} contest sources", self.adapters.len());
        let results = join_all(self.adapters.iter().map(|adapter| adapter.fetch())).await;

        let mut merged: Vec<NormalizedContest> = Vec::new();
        let mut sources = Vec::new();
        let mut reports = Vec::with_capacity(results.len());

        // join_all preserves input order, so this loop runs in priority order
        for (adapter, result) in self.adapters.iter().zip(results) {
            let report = SourceReport::from_result(adapter.name(), &result);
            match result {
                Ok(records) => {
                    sources.push(adapter.name().to_string());
                    merged = merge_contests(merged, records);
                }
                Err(e) if e.is_timeout() => {
                    warn!("Contest source {} timed out: {}", adapter.name(), e);
                }
                Err(e) => {
                    warn!("Contest source {} failed: {}", adapter.name(), e);
                }
            }
            reports.push(report);
        }

        let window = RelevanceWindow::ending_at(now, self.settings.window_days);
        let before = merged.len();
        merged.retain(|contest| window.contains(contest));
        info!(
            "Merged {} contests, {} inside the {}-day window",
            before,
            merged.len(),
            window.days
        );
        if self.settings.upcoming_only {
            merged.retain(|contest| contest.phase_at(now) != ContestPhase::Finished);
            debug!("{} contests not finished yet", merged.len());
        }

        let mut contests = ensure_minimum(
            merged,
            self.settings.min_count,
            &self.settings.required_platforms,
            &self.settings.templates,
            now,
        );
        contests.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        let fallback_applied = contests.iter().any(|c| c.synthesized);

        info!(
            "Contest aggregation done: {} contests from {}/{} sources, fallback applied: {}",
            contests.len(),
            sources.len(),
            self.adapters.len(),
            fallback_applied
        );

        ContestAggregate {
            contests,
            sources,
            reports,
            window,
            fallback_applied,
        }
    }
}

/// Builds the production transport from the configured HTTP timeout
pub fn build_transport(config: &Config) -> Result<Arc<dyn Transport>, AppError> {
    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    Ok(Arc::new(ReqwestTransport::new(client)))
}

/// Main entry point for the contest use case: aggregate every source
/// configured in `config` as of now.
///
/// # Example
/// ```rust,no_run
/// use codefolio::Config;
/// use codefolio::data_fetcher::api::fetch_contests;
///
/// #[tokio::main]
/// async fn main() -> Result<(), codefolio::AppError> {
///     let config = Config::load().await?;
///     let aggregate = fetch_contests(&config).await?;
///     println!("{} contests", aggregate.contests.len());
///     Ok(())
/// }
/// ```
pub async fn fetch_contests(config: &Config) -> Result<ContestAggregate, AppError> {
    let transport = build_transport(config)?;
    Ok(ContestAggregator::from_config(config, transport)
        .aggregate(Utc::now())
        .await)
}
