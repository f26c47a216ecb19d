//! Synthesized contests for weekly recurring events

use chrono::{DateTime, Datelike, Days, Duration, Utc, Weekday};
use tracing::{debug, info, warn};

use crate::data_fetcher::models::{NormalizedContest, Platform, RecurringContest};
use crate::data_fetcher::processors::merge_contests;

/// Next `weekday` at `hour:minute` UTC strictly after `now`.
///
/// Today's slot counts when it has not been reached yet; at or past it the
/// result rolls forward a week. `None` only for an invalid hour or minute.
pub fn next_occurrence(
    weekday: Weekday,
    hour: u32,
    minute: u32,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let days_ahead = (7 + weekday.num_days_from_monday() - now.weekday().num_days_from_monday()) % 7;
    let date = now.date_naive().checked_add_days(Days::new(u64::from(days_ahead)))?;
    let candidate = date.and_hms_opt(hour, minute, 0)?.and_utc();

    if candidate <= now {
        Some(candidate + Duration::days(7))
    } else {
        Some(candidate)
    }
}

/// The next occurrence of a template as a synthesized contest
pub fn synthesize(template: &RecurringContest, now: DateTime<Utc>) -> Option<NormalizedContest> {
    let Some(start) = next_occurrence(template.weekday, template.hour, template.minute, now)
    else {
        warn!(
            "Recurring contest '{}' has invalid time {:02}:{:02}",
            template.name, template.hour, template.minute
        );
        return None;
    };
    let mut contest = NormalizedContest::new(
        template.platform,
        template.name.as_str(),
        start,
        template.duration_minutes.saturating_mul(60),
        template.url.as_str(),
    );
    contest.synthesized = true;
    Some(contest)
}

/// Tops up a contest set that came back short.
///
/// Synthesis triggers when there are fewer than `min_count` records or a
/// required platform has none. Below the minimum every template is
/// synthesized; otherwise only templates for the missing platforms. Results
/// merge with the usual dedup rule so a live record is never duplicated. An
/// empty template list falls back to [`RecurringContest::defaults`].
pub fn ensure_minimum(
    records: Vec<NormalizedContest>,
    min_count: usize,
    required_platforms: &[Platform],
    templates: &[RecurringContest],
    now: DateTime<Utc>,
) -> Vec<NormalizedContest> {
    let missing: Vec<Platform> = required_platforms
        .iter()
        .copied()
        .filter(|platform| !records.iter().any(|c| c.platform == *platform))
        .collect();
    let below_minimum = records.len() < min_count;

    if !below_minimum && missing.is_empty() {
        debug!(
            "No fallback needed: {} contests, all required platforms present",
            records.len()
        );
        return records;
    }

    let defaults;
    let templates = if templates.is_empty() {
        defaults = RecurringContest::defaults();
        defaults.as_slice()
    } else {
        templates
    };

    let chosen: Vec<&RecurringContest> = templates
        .iter()
        .filter(|t| below_minimum || missing.contains(&t.platform))
        .collect();

    for platform in &missing {
        if !templates.iter().any(|t| t.platform == *platform) {
            warn!("Required platform {} missing and no recurring template covers it", platform);
        }
    }

    info!(
        "Applying contest fallback: {} records (minimum {}), missing platforms {:?}, synthesizing {} templates",
        records.len(),
        min_count,
        missing,
        chosen.len()
    );

    let synthesized = chosen.into_iter().filter_map(|t| synthesize(t, now));
    merge_contests(records, synthesized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_next_occurrence_later_today() {
        // 2024-05-05 is a Sunday
        let now = utc(2024, 5, 5, 1, 0);
        assert_eq!(
            next_occurrence(Weekday::Sun, 2, 30, now),
            Some(utc(2024, 5, 5, 2, 30))
        );
    }

    #[test]
    fn test_next_occurrence_rolls_forward_at_or_after_slot() {
        let at_slot = utc(2024, 5, 5, 2, 30);
        assert_eq!(
            next_occurrence(Weekday::Sun, 2, 30, at_slot),
            Some(utc(2024, 5, 12, 2, 30))
        );
        let after = utc(2024, 5, 5, 3, 0);
        assert_eq!(
            next_occurrence(Weekday::Sun, 2, 30, after),
            Some(utc(2024, 5, 12, 2, 30))
        );
    }

    #[test]
    fn test_next_occurrence_is_always_future() {
        let start = utc(2024, 5, 1, 0, 0);
        for hours in (0..24 * 14).step_by(5) {
            let now = start + Duration::hours(hours);
            for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Sun] {
                let next = next_occurrence(weekday, 14, 30, now).unwrap();
                assert!(next > now);
                assert!(next - now <= Duration::days(7));
                assert_eq!(next.weekday(), weekday);
            }
        }
    }

    #[test]
    fn test_next_occurrence_rejects_invalid_time() {
        assert_eq!(next_occurrence(Weekday::Mon, 24, 0, utc(2024, 5, 1, 0, 0)), None);
    }

    #[test]
    fn test_all_sources_empty_still_yields_contests() {
        let now = utc(2024, 5, 1, 12, 0);
        let contests = ensure_minimum(Vec::new(), 5, &[Platform::LeetCode], &[], now);

        assert_eq!(contests.len(), 2);
        assert!(contests.iter().all(|c| c.synthesized && c.start > now));
        assert!(contests.iter().any(|c| c.platform == Platform::LeetCode));
        assert!(contests.iter().any(|c| c.platform == Platform::CodeChef));
    }

    #[test]
    fn test_only_missing_required_platform_synthesized() {
        let now = utc(2024, 5, 1, 12, 0);
        let live = TestDataBuilder::contest_series(Platform::CodeForces, 6, now);
        let contests = ensure_minimum(live, 5, &[Platform::LeetCode], &[], now);

        assert_eq!(contests.len(), 7);
        let synthesized: Vec<_> = contests.iter().filter(|c| c.synthesized).collect();
        assert_eq!(synthesized.len(), 1);
        assert_eq!(synthesized[0].platform, Platform::LeetCode);
    }

    #[test]
    fn test_nothing_added_when_satisfied() {
        let now = utc(2024, 5, 1, 12, 0);
        let mut live = TestDataBuilder::contest_series(Platform::CodeForces, 4, now);
        live.push(TestDataBuilder::contest(Platform::LeetCode, "Weekly Contest 400", now));
        let contests = ensure_minimum(live.clone(), 5, &[Platform::LeetCode], &[], now);
        assert_eq!(contests, live);
    }

    #[test]
    fn test_synthesized_never_duplicates_live_record() {
        // Wednesday before the Starters slot
        let now = utc(2024, 5, 1, 10, 0);
        let template = RecurringContest::defaults()
            .into_iter()
            .find(|t| t.platform == Platform::CodeChef)
            .unwrap();
        let live = vec![synthesize(&template, now).map(|mut c| {
            c.synthesized = false;
            c
        })
        .unwrap()];

        let contests = ensure_minimum(live, 5, &[], std::slice::from_ref(&template), now);

        assert_eq!(contests.len(), 1);
        assert!(!contests[0].synthesized);
    }
}
