//! Profile aggregation: one fallback chain per platform, run concurrently

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::orchestrator::build_transport;
use super::transport::Transport;
use crate::config::Config;
use crate::data_fetcher::adapters::{
    AdapterContext, CodeChefProfileAdapter, CodeforcesMirrorAdapter, CodeforcesProfileAdapter,
    GeeksforGeeksAuthAdapter, GeeksforGeeksProfileAdapter, LeetCodeProfileAdapter,
    LeetCodeStatsAdapter,
};
use crate::data_fetcher::cache::{FileSnapshotCache, SnapshotCache};
use crate::data_fetcher::fallback::ProfileChain;
use crate::data_fetcher::models::{NormalizedCodingProfile, Platform, ProfileSource};
use crate::data_fetcher::processors::merge_profiles;
use crate::error::AppError;

/// Sums across the returned profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfileTotals {
    pub problems_solved: u64,
    pub contests_attended: u64,
    /// Profiles that came from a live or alternate fetch in this run
    pub live_platforms: usize,
}

impl ProfileTotals {
    pub fn from_profiles(profiles: &[NormalizedCodingProfile]) -> Self {
        profiles.iter().fold(Self::default(), |mut totals, profile| {
            totals.problems_solved += profile.problems_solved;
            totals.contests_attended += profile.contests_attended;
            if matches!(
                profile.source,
                ProfileSource::Live | ProfileSource::Alternate
            ) {
                totals.live_platforms += 1;
            }
            totals
        })
    }
}

/// The consolidated profile response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAggregate {
    pub profiles: Vec<NormalizedCodingProfile>,
    /// Adapters that produced a profile in this run
    pub sources: Vec<String>,
    pub totals: ProfileTotals,
}

pub struct ProfileAggregator {
    chains: Vec<ProfileChain>,
    cache: Arc<dyn SnapshotCache>,
    ttl: Duration,
}

impl ProfileAggregator {
    pub fn new(chains: Vec<ProfileChain>, cache: Arc<dyn SnapshotCache>, ttl: Duration) -> Self {
        Self { chains, cache, ttl }
    }

    /// One chain per platform with a profile adapter. CodeChef has no alternate.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        let endpoints = &config.endpoints;
        let primary = |base: &str| {
            AdapterContext::new(transport.clone(), base, config.timeouts.profile())
        };
        let alternate = |base: &str| {
            AdapterContext::new(transport.clone(), base, config.timeouts.alternate())
        };

        let chains = vec![
            ProfileChain::new(Box::new(LeetCodeProfileAdapter::new(primary(
                &endpoints.leetcode,
            ))))
            .with_alternate(Box::new(LeetCodeStatsAdapter::new(alternate(
                &endpoints.leetcode_stats,
            )))),
            ProfileChain::new(Box::new(CodeforcesProfileAdapter::new(primary(
                &endpoints.codeforces,
            ))))
            .with_alternate(Box::new(CodeforcesMirrorAdapter::new(alternate(
                &endpoints.codeforces_mirror,
            )))),
            ProfileChain::new(Box::new(CodeChefProfileAdapter::new(primary(
                &endpoints.codechef_stats,
            )))),
            ProfileChain::new(Box::new(GeeksforGeeksProfileAdapter::new(primary(
                &endpoints.geeksforgeeks,
            ))))
            .with_alternate(Box::new(GeeksforGeeksAuthAdapter::new(alternate(
                &endpoints.geeksforgeeks_auth,
            )))),
        ]
        .into_iter()
        .map(|chain| {
            let baseline = config.baseline_for(chain.platform()).cloned();
            chain.with_baseline(baseline)
        })
        .collect();

        Self::new(chains, cache, config.aggregation.snapshot_ttl())
    }

    fn chain_for(&self, platform: Platform) -> Option<&ProfileChain> {
        self.chains.iter().find(|chain| chain.platform() == platform)
    }

    /// Resolves every `(platform, handle)` pair concurrently. Pairs for
    /// platforms without a chain are skipped; a platform listed twice keeps
    /// its first handle.
    #[instrument(skip(self, handles))]
    pub async fn aggregate(
        &self,
        handles: &[(Platform, &str)],
        now: DateTime<Utc>,
    ) -> ProfileAggregate {
        let mut jobs: Vec<(&ProfileChain, &str)> = Vec::with_capacity(handles.len());
        for (platform, handle) in handles {
            let Some(chain) = self.chain_for(*platform) else {
                warn!("No profile adapters for {}, skipping {}", platform, handle);
                continue;
            };
            if jobs.iter().any(|(queued, _)| queued.platform() == *platform) {
                warn!("Duplicate {} handle {} ignored", platform, handle);
                continue;
            }
            jobs.push((chain, *handle));
        }

        info!("Resolving {} profiles", jobs.len());
        let resolved = join_all(
            jobs.iter()
                .map(|(chain, handle)| chain.resolve(handle, self.cache.as_ref(), self.ttl, now)),
        )
        .await;

        let mut sources = Vec::new();
        let mut profiles = Vec::new();
        for result in resolved {
            if let Some(adapter) = result.adapter {
                sources.push(adapter.to_string());
            }
            profiles = merge_profiles(profiles, std::iter::once(result.profile));
        }

        let totals = ProfileTotals::from_profiles(&profiles);
        info!(
            "Profile aggregation done: {} profiles, {} live, {} problems solved",
            profiles.len(),
            totals.live_platforms,
            totals.problems_solved
        );

        ProfileAggregate {
            profiles,
            sources,
            totals,
        }
    }
}

/// Main entry point for the profile use case, backed by the snapshot file
/// configured in `config`.
pub async fn fetch_profiles(
    config: &Config,
    handles: &[(Platform, &str)],
) -> Result<ProfileAggregate, AppError> {
    let transport = build_transport(config)?;
    let cache: Arc<dyn SnapshotCache> =
        Arc::new(FileSnapshotCache::new(config.aggregation.snapshot_path()));
    Ok(ProfileAggregator::from_config(config, transport, cache)
        .aggregate(handles, Utc::now())
        .await)
}
