use chrono::{DateTime, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::Platform;
use crate::constants::contests::MAX_DURATION_SECONDS;
use crate::data_fetcher::processors::contest_id;

/// A contest in the shared shape every contest adapter maps into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedContest {
    /// Derived from (platform, name, start); doubles as the deduplication key
    pub id: String,
    pub name: String,
    pub platform: Platform,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    pub url: String,
    /// True when produced by fallback synthesis instead of a live source
    #[serde(default)]
    pub synthesized: bool,
}

/// Where a contest sits relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestPhase {
    Upcoming,
    Running,
    Finished,
}

impl NormalizedContest {
    /// Builds a contest from its start and duration. The duration clamps to
    /// `0..=MAX_DURATION_SECONDS`; callers that must reject implausible
    /// durations check [`NormalizedContest::is_plausible_duration`] first.
    pub fn new(
        platform: Platform,
        name: impl Into<String>,
        start: DateTime<Utc>,
        duration_seconds: i64,
        url: impl Into<String>,
    ) -> Self {
        let name = name.into().trim().to_string();
        let duration_seconds = duration_seconds.clamp(0, MAX_DURATION_SECONDS);
        let end = Duration::try_seconds(duration_seconds)
            .and_then(|duration| start.checked_add_signed(duration))
            .unwrap_or(start);
        Self {
            id: contest_id(platform, &name, start),
            end,
            name,
            platform,
            start,
            duration_seconds,
            url: url.into(),
            synthesized: false,
        }
    }

    /// Builds a contest from explicit start and end timestamps
    pub fn from_bounds(
        platform: Platform,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        let duration = (end - start).num_seconds();
        Self::new(platform, name, start, duration, url)
    }

    /// True for durations a provider could sensibly report
    pub fn is_plausible_duration(seconds: i64) -> bool {
        seconds <= MAX_DURATION_SECONDS
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> ContestPhase {
        if now < self.start {
            ContestPhase::Upcoming
        } else if now < self.end {
            ContestPhase::Running
        } else {
            ContestPhase::Finished
        }
    }
}

/// A contest that repeats every week at a fixed weekday and UTC time.
///
/// Used by the fallback layer to synthesize entries when live sources come
/// back short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringContest {
    pub name: String,
    pub platform: Platform,
    pub weekday: Weekday,
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    pub duration_minutes: i64,
    pub url: String,
}

impl RecurringContest {
    /// Built-in templates used when the configuration does not provide any
    pub fn defaults() -> Vec<RecurringContest> {
        vec![
            RecurringContest {
                name: "LeetCode Weekly Contest".to_string(),
                platform: Platform::LeetCode,
                weekday: Weekday::Sun,
                hour: 2,
                minute: 30,
                duration_minutes: 90,
                url: "https://leetcode.com/contest/".to_string(),
            },
            RecurringContest {
                name: "CodeChef Starters".to_string(),
                platform: Platform::CodeChef,
                weekday: Weekday::Wed,
                hour: 14,
                minute: 30,
                duration_minutes: 120,
                url: "https://www.codechef.com/contests".to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_computes_end_and_id() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let contest = NormalizedContest::new(
            Platform::CodeForces,
            "  Round 900  ",
            start,
            7200,
            "https://codeforces.com/contests/1900",
        );

        assert_eq!(contest.name, "Round 900");
        assert_eq!(contest.end, start + Duration::hours(2));
        assert_eq!(contest.id, "codeforces-1714564800-round900");
        assert!(!contest.synthesized);
    }

    #[test]
    fn test_from_bounds_clamps_inverted_interval() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let contest = NormalizedContest::from_bounds(
            Platform::AtCoder,
            "ABC 350",
            start,
            start - Duration::hours(1),
            "",
        );
        assert_eq!(contest.duration_seconds, 0);
        assert_eq!(contest.end, start);
    }

    #[test]
    fn test_new_clamps_oversized_duration() {
        let start = Utc.with_ymd_and_hms(2024, 6, 2, 2, 30, 0).unwrap();
        let contest = NormalizedContest::new(Platform::LeetCode, "X", start, i64::MAX, "");

        assert_eq!(contest.duration_seconds, MAX_DURATION_SECONDS);
        assert_eq!(contest.end, start + Duration::seconds(MAX_DURATION_SECONDS));
        assert!(!NormalizedContest::is_plausible_duration(i64::MAX));
        assert!(NormalizedContest::is_plausible_duration(7200));
    }

    #[test]
    fn test_phase_at() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let contest = NormalizedContest::new(Platform::LeetCode, "Weekly 400", start, 5400, "");

        assert_eq!(
            contest.phase_at(start - Duration::minutes(1)),
            ContestPhase::Upcoming
        );
        assert_eq!(contest.phase_at(start), ContestPhase::Running);
        assert_eq!(
            contest.phase_at(start + Duration::minutes(90)),
            ContestPhase::Finished
        );
    }

    #[test]
    fn test_recurring_contest_parses_from_toml() {
        let template: RecurringContest = toml::from_str(
            r#"
name = "AtCoder Beginner Contest"
platform = "atcoder.jp"
weekday = "Sat"
hour = 12
duration_minutes = 100
url = "https://atcoder.jp/contests/"
"#,
        )
        .unwrap();

        assert_eq!(template.platform, Platform::AtCoder);
        assert_eq!(template.weekday, Weekday::Sat);
        assert_eq!(template.minute, 0);
    }
}
