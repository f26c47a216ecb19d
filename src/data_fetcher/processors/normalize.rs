//! Platform canonicalization, contest identity and cross-source merging

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::data_fetcher::models::{NormalizedCodingProfile, NormalizedContest, Platform};

/// Folds a raw platform label into a lookup key: lower-case with whitespace,
/// underscores and hyphens removed, and a leading `www.` dropped.
fn platform_key(raw: &str) -> String {
    let key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    match key.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => key,
    }
}

/// Resolves a provider's platform label to its canonical platform.
///
/// Returns `None` for labels outside the alias table (for example
/// `CodeForces::Gym`, which is not a rated contest feed).
pub fn canonicalize_platform(raw: &str) -> Option<Platform> {
    let platform = match platform_key(raw).as_str() {
        "codeforces" | "codeforces.com" | "cf" => Platform::CodeForces,
        "codechef" | "codechef.com" => Platform::CodeChef,
        "leetcode" | "leetcode.com" | "lc" => Platform::LeetCode,
        "geeksforgeeks" | "geeksforgeeks.org" | "practice.geeksforgeeks.org" | "gfg" => {
            Platform::GeeksforGeeks
        }
        "atcoder" | "atcoder.jp" => Platform::AtCoder,
        "hackerrank" | "hackerrank.com" => Platform::HackerRank,
        "hackerearth" | "hackerearth.com" => Platform::HackerEarth,
        "topcoder" | "topcoder.com" => Platform::TopCoder,
        _ => {
            trace!("No canonical platform for label '{}'", raw);
            return None;
        }
    };
    Some(platform)
}

/// Lower-cased contest name with all whitespace removed
pub fn dedup_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Stable contest identifier, also used as the deduplication key
pub fn contest_id(platform: Platform, name: &str, start: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        platform.slug(),
        start.timestamp(),
        dedup_name(name)
    )
}

/// Appends `incoming` contests whose key is not already present.
///
/// The first record to report a key wins, so callers merge sources in
/// priority order. Duplicates inside `incoming` collapse the same way.
pub fn merge_contests(
    mut existing: Vec<NormalizedContest>,
    incoming: impl IntoIterator<Item = NormalizedContest>,
) -> Vec<NormalizedContest> {
    let mut seen: HashSet<String> = existing.iter().map(|c| c.id.clone()).collect();
    let before = existing.len();
    let mut skipped = 0usize;

    for contest in incoming {
        if seen.insert(contest.id.clone()) {
            existing.push(contest);
        } else {
            skipped += 1;
        }
    }

    debug!(
        "Merged contests: {} new, {} duplicates skipped, {} total",
        existing.len() - before,
        skipped,
        existing.len()
    );
    existing
}

/// Profile counterpart of [`merge_contests`], keyed by platform
pub fn merge_profiles(
    mut existing: Vec<NormalizedCodingProfile>,
    incoming: impl IntoIterator<Item = NormalizedCodingProfile>,
) -> Vec<NormalizedCodingProfile> {
    let mut seen: HashSet<Platform> = existing.iter().map(|p| p.platform).collect();
    for profile in incoming {
        if seen.insert(profile.platform) {
            existing.push(profile);
        }
    }
    existing
}
