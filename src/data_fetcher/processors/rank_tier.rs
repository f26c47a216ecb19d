//! Rank tiers derived from numeric ratings

use crate::data_fetcher::models::{GlobalRank, Platform};

/// Label used when a rating is absent or zero
pub const UNRATED: &str = "Unrated";

/// Codeforces tiers, highest threshold first. A rating belongs to the first
/// tier whose threshold it meets.
const CODEFORCES_TIERS: &[(i64, &str)] = &[
    (3000, "Legendary Grandmaster"),
    (2600, "International Grandmaster"),
    (2400, "Grandmaster"),
    (2300, "International Master"),
    (2100, "Master"),
    (1900, "Candidate Master"),
    (1600, "Expert"),
    (1400, "Specialist"),
    (1200, "Pupil"),
    (i64::MIN, "Newbie"),
];

const CODECHEF_TIERS: &[(i64, &str)] = &[
    (2500, "7★"),
    (2200, "6★"),
    (2000, "5★"),
    (1800, "4★"),
    (1600, "3★"),
    (1400, "2★"),
    (i64::MIN, "1★"),
];

const LEETCODE_TIERS: &[(i64, &str)] = &[
    (2150, "Guardian"),
    (1850, "Knight"),
    (i64::MIN, "Contender"),
];

fn lookup(table: &[(i64, &'static str)], rating: i64) -> &'static str {
    table
        .iter()
        .find(|(threshold, _)| rating >= *threshold)
        .map(|(_, label)| *label)
        .unwrap_or(UNRATED)
}

/// Human-readable tier for a rating on the given platform.
///
/// Ratings of zero or below are "Unrated" everywhere; platforms without a
/// tier table are always "Unrated".
pub fn rank_tier(platform: Platform, rating: i64) -> String {
    if rating <= 0 {
        return UNRATED.to_string();
    }
    let label = match platform {
        Platform::CodeForces => lookup(CODEFORCES_TIERS, rating),
        Platform::CodeChef => lookup(CODECHEF_TIERS, rating),
        Platform::LeetCode => lookup(LEETCODE_TIERS, rating),
        _ => UNRATED,
    };
    label.to_string()
}

/// Rough global rank estimate for Codeforces from the rating alone.
///
/// Codeforces has no ranking lookup by handle, so this is a cubic falloff
/// calibrated to roughly 120k rated users. Always flagged approximate.
pub fn approximate_codeforces_global_rank(rating: i64) -> Option<GlobalRank> {
    if rating <= 0 {
        return None;
    }
    let headroom = (4000 - rating.clamp(0, 4000)) as f64 / 4000.0;
    let estimate = (headroom.powi(3) * 120_000.0).round() as u64;
    Some(GlobalRank::approximate(estimate.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codeforces_thresholds() {
        let cases = [
            (1, "Newbie"),
            (1199, "Newbie"),
            (1200, "Pupil"),
            (1399, "Pupil"),
            (1400, "Specialist"),
            (1600, "Expert"),
            (1850, "Expert"),
            (1899, "Expert"),
            (1900, "Candidate Master"),
            (2100, "Master"),
            (2300, "International Master"),
            (2400, "Grandmaster"),
            (2600, "International Grandmaster"),
            (2999, "International Grandmaster"),
            (3000, "Legendary Grandmaster"),
            (3800, "Legendary Grandmaster"),
        ];
        for (rating, expected) in cases {
            assert_eq!(
                rank_tier(Platform::CodeForces, rating),
                expected,
                "rating {rating}"
            );
        }
    }

    #[test]
    fn test_codechef_stars() {
        assert_eq!(rank_tier(Platform::CodeChef, 1399), "1★");
        assert_eq!(rank_tier(Platform::CodeChef, 1400), "2★");
        assert_eq!(rank_tier(Platform::CodeChef, 1750), "3★");
        assert_eq!(rank_tier(Platform::CodeChef, 2000), "5★");
        assert_eq!(rank_tier(Platform::CodeChef, 2499), "6★");
        assert_eq!(rank_tier(Platform::CodeChef, 2500), "7★");
    }

    #[test]
    fn test_leetcode_badges() {
        assert_eq!(rank_tier(Platform::LeetCode, 1500), "Contender");
        assert_eq!(rank_tier(Platform::LeetCode, 1850), "Knight");
        assert_eq!(rank_tier(Platform::LeetCode, 2150), "Guardian");
    }

    #[test]
    fn test_unrated_cases() {
        assert_eq!(rank_tier(Platform::CodeForces, 0), UNRATED);
        assert_eq!(rank_tier(Platform::CodeChef, -5), UNRATED);
        assert_eq!(rank_tier(Platform::GeeksforGeeks, 1800), UNRATED);
    }

    #[test]
    fn test_approximate_global_rank_is_flagged_and_monotonic() {
        assert_eq!(approximate_codeforces_global_rank(0), None);
        let low = approximate_codeforces_global_rank(1200).unwrap();
        let high = approximate_codeforces_global_rank(2400).unwrap();
        assert!(low.approximate && high.approximate);
        assert!(high.value < low.value);
        assert_eq!(approximate_codeforces_global_rank(4500).unwrap().value, 1);
    }
}
