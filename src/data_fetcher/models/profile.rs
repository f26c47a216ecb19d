use serde::{Deserialize, Serialize};

use super::Platform;
use crate::data_fetcher::processors::{UNRATED, rank_tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Direction and size of the most recent rating change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub delta: i64,
}

impl Trend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            delta: 0,
        }
    }
}

impl Default for Trend {
    fn default() -> Self {
        Self::stable()
    }
}

/// Global rank as reported (or estimated) for a profile.
///
/// `approximate` is set when the value is derived from the rating rather than
/// looked up, and must not be presented as an actual ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRank {
    pub value: u64,
    pub approximate: bool,
}

impl GlobalRank {
    pub fn exact(value: u64) -> Self {
        Self {
            value,
            approximate: false,
        }
    }

    pub fn approximate(value: u64) -> Self {
        Self {
            value,
            approximate: true,
        }
    }
}

/// Which step of the fallback chain produced a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Live,
    Alternate,
    Cache,
    Baseline,
    None,
}

/// Per-platform coding statistics in the shared shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCodingProfile {
    pub platform: Platform,
    pub handle: String,
    pub rating: i64,
    pub peak_rating: i64,
    pub rank: String,
    pub problems_solved: u64,
    pub contests_attended: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<GlobalRank>,
    #[serde(default)]
    pub trend: Trend,
    pub profile_url: String,
    pub source: ProfileSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedCodingProfile {
    /// Empty live profile with every stat at its explicit default
    pub fn new(platform: Platform, handle: impl Into<String>) -> Self {
        let handle = handle.into();
        Self {
            profile_url: platform.profile_url(&handle),
            platform,
            handle,
            rating: 0,
            peak_rating: 0,
            rank: UNRATED.to_string(),
            problems_solved: 0,
            contests_attended: 0,
            global_rank: None,
            trend: Trend::stable(),
            source: ProfileSource::Live,
            error: None,
        }
    }

    /// Error-marked profile. Stats stay at their defaults so the marker and
    /// populated stats never coexist.
    pub fn unavailable(
        platform: Platform,
        handle: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source: ProfileSource::None,
            error: Some(reason.into()),
            ..Self::new(platform, handle)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn with_source(mut self, source: ProfileSource) -> Self {
        self.source = source;
        self
    }
}

/// Last-known stats supplied by configuration, used when every live source
/// and the snapshot cache come up empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileBaseline {
    pub platform: Platform,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub peak_rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default)]
    pub problems_solved: u64,
    #[serde(default)]
    pub contests_attended: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<u64>,
}

impl ProfileBaseline {
    pub fn to_profile(&self, handle: &str) -> NormalizedCodingProfile {
        let mut profile = NormalizedCodingProfile::new(self.platform, handle);
        profile.rating = self.rating;
        profile.peak_rating = self.peak_rating.max(self.rating);
        profile.rank = self
            .rank
            .clone()
            .unwrap_or_else(|| rank_tier(self.platform, self.rating));
        profile.problems_solved = self.problems_solved;
        profile.contests_attended = self.contests_attended;
        profile.global_rank = self.global_rank.map(GlobalRank::exact);
        profile.source = ProfileSource::Baseline;
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_has_explicit_defaults() {
        let profile = NormalizedCodingProfile::new(Platform::CodeForces, "tourist");
        assert_eq!(profile.rating, 0);
        assert_eq!(profile.rank, "Unrated");
        assert_eq!(profile.trend, Trend::stable());
        assert_eq!(profile.profile_url, "https://codeforces.com/profile/tourist");
        assert!(!profile.is_error());
    }

    #[test]
    fn test_unavailable_profile_has_no_stats() {
        let profile = NormalizedCodingProfile::unavailable(
            Platform::LeetCode,
            "someone",
            "all sources failed",
        );
        assert!(profile.is_error());
        assert_eq!(profile.source, ProfileSource::None);
        assert_eq!(profile.problems_solved, 0);
        assert_eq!(profile.rating, 0);
    }

    #[test]
    fn test_baseline_derives_rank_when_missing() {
        let baseline = ProfileBaseline {
            platform: Platform::CodeForces,
            rating: 1850,
            peak_rating: 1700,
            rank: None,
            problems_solved: 420,
            contests_attended: 37,
            global_rank: None,
        };
        let profile = baseline.to_profile("someone");
        assert_eq!(profile.rank, "Expert");
        assert_eq!(profile.peak_rating, 1850);
        assert_eq!(profile.source, ProfileSource::Baseline);
    }

    #[test]
    fn test_error_field_skipped_when_absent() {
        let profile = NormalizedCodingProfile::new(Platform::CodeChef, "chef");
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["platform"], "CodeChef");
        assert_eq!(json["trend"]["direction"], "stable");
    }
}
