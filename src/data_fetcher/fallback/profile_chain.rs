//! Per-platform profile resolution with layered fallbacks.
//!
//! Order: primary live → alternate live → fresh snapshot → configured
//! baseline → stale snapshot → error-marked record. Live and alternate
//! successes overwrite the snapshot before returning.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::data_fetcher::adapters::ProfileAdapter;
use crate::data_fetcher::cache::{CachedSnapshot, SnapshotCache, snapshot_key};
use crate::data_fetcher::models::{
    NormalizedCodingProfile, Platform, ProfileBaseline, ProfileSource,
};

/// Result of walking one chain
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub profile: NormalizedCodingProfile,
    /// Adapter that produced the profile, when it came from the network
    pub adapter: Option<&'static str>,
    /// Failures collected from the adapters that were tried
    pub errors: Vec<String>,
}

pub struct ProfileChain {
    pub(crate) primary: Box<dyn ProfileAdapter>,
    pub(crate) alternate: Option<Box<dyn ProfileAdapter>>,
    pub(crate) baseline: Option<ProfileBaseline>,
}

impl ProfileChain {
    pub fn new(primary: Box<dyn ProfileAdapter>) -> Self {
        Self {
            primary,
            alternate: None,
            baseline: None,
        }
    }

    pub fn with_alternate(mut self, alternate: Box<dyn ProfileAdapter>) -> Self {
        self.alternate = Some(alternate);
        self
    }

    pub fn with_baseline(mut self, baseline: Option<ProfileBaseline>) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn platform(&self) -> Platform {
        self.primary.platform()
    }

    /// Walks the chain for `handle`. Never fails; the last step is an
    /// error-marked profile with default stats.
    #[instrument(skip(self, cache), fields(platform = %self.platform()))]
    pub async fn resolve(
        &self,
        handle: &str,
        cache: &dyn SnapshotCache,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> ResolvedProfile {
        let platform = self.platform();
        let key = snapshot_key(platform, handle);
        let mut errors = Vec::new();

        let live = std::iter::once((self.primary.as_ref(), ProfileSource::Live)).chain(
            self.alternate
                .as_deref()
                .map(|alternate| (alternate, ProfileSource::Alternate)),
        );

        for (adapter, source) in live {
            match adapter.fetch(handle).await {
                Ok(profile) => {
                    let profile = profile.with_source(source);
                    cache
                        .put(&key, CachedSnapshot::new(profile.clone(), now))
                        .await;
                    info!(
                        "{} profile for {} resolved from {}",
                        platform,
                        handle,
                        adapter.name()
                    );
                    return ResolvedProfile {
                        profile,
                        adapter: Some(adapter.name()),
                        errors,
                    };
                }
                Err(e) => {
                    warn!("{} failed for {}: {}", adapter.name(), handle, e);
                    errors.push(format!("{}: {}", adapter.name(), e));
                }
            }
        }

        let snapshot = cache.get(&key).await;
        if let Some(snapshot) = &snapshot
            && snapshot.is_fresh(now, ttl)
        {
            info!("{} profile for {} served from fresh snapshot", platform, handle);
            return ResolvedProfile {
                profile: snapshot.profile.clone().with_source(ProfileSource::Cache),
                adapter: None,
                errors,
            };
        }

        if let Some(baseline) = &self.baseline {
            info!("{} profile for {} served from configured baseline", platform, handle);
            return ResolvedProfile {
                profile: baseline.to_profile(handle),
                adapter: None,
                errors,
            };
        }

        if let Some(snapshot) = snapshot {
            info!(
                "{} profile for {} served from stale snapshot (age {:?})",
                platform,
                handle,
                snapshot.age(now)
            );
            return ResolvedProfile {
                profile: snapshot.profile.with_source(ProfileSource::Cache),
                adapter: None,
                errors,
            };
        }

        debug!("Every fallback exhausted for {} {}", platform, handle);
        let reason = if errors.is_empty() {
            "no source available".to_string()
        } else {
            errors.join("; ")
        };
        ResolvedProfile {
            profile: NormalizedCodingProfile::unavailable(platform, handle, reason),
            adapter: None,
            errors,
        }
    }
}
