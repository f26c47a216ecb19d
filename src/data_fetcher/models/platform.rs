use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data_fetcher::processors::canonicalize_platform;
use crate::error::AppError;

/// Coding platforms known to the aggregator.
///
/// Serialized with the canonical display name. Deserialization accepts any
/// alias understood by [`canonicalize_platform`], so config files can say
/// `codeforces` or `cf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    LeetCode,
    CodeForces,
    CodeChef,
    GeeksforGeeks,
    AtCoder,
    HackerRank,
    HackerEarth,
    TopCoder,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::LeetCode,
        Platform::CodeForces,
        Platform::CodeChef,
        Platform::GeeksforGeeks,
        Platform::AtCoder,
        Platform::HackerRank,
        Platform::HackerEarth,
        Platform::TopCoder,
    ];

    /// Platforms that have profile adapters
    pub const WITH_PROFILES: [Platform; 4] = [
        Platform::LeetCode,
        Platform::CodeForces,
        Platform::CodeChef,
        Platform::GeeksforGeeks,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Platform::LeetCode => "LeetCode",
            Platform::CodeForces => "CodeForces",
            Platform::CodeChef => "CodeChef",
            Platform::GeeksforGeeks => "GeeksforGeeks",
            Platform::AtCoder => "AtCoder",
            Platform::HackerRank => "HackerRank",
            Platform::HackerEarth => "HackerEarth",
            Platform::TopCoder => "TopCoder",
        }
    }

    /// Lower-case identifier used in contest ids and cache keys
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::CodeForces => "codeforces",
            Platform::CodeChef => "codechef",
            Platform::GeeksforGeeks => "geeksforgeeks",
            Platform::AtCoder => "atcoder",
            Platform::HackerRank => "hackerrank",
            Platform::HackerEarth => "hackerearth",
            Platform::TopCoder => "topcoder",
        }
    }

    /// Public profile page for a handle on this platform
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            Platform::LeetCode => format!("https://leetcode.com/u/{handle}/"),
            Platform::CodeForces => format!("https://codeforces.com/profile/{handle}"),
            Platform::CodeChef => format!("https://www.codechef.com/users/{handle}"),
            Platform::GeeksforGeeks => {
                format!("https://www.geeksforgeeks.org/user/{handle}/")
            }
            Platform::AtCoder => format!("https://atcoder.jp/users/{handle}"),
            Platform::HackerRank => format!("https://www.hackerrank.com/profile/{handle}"),
            Platform::HackerEarth => format!("https://www.hackerearth.com/@{handle}"),
            Platform::TopCoder => format!("https://profiles.topcoder.com/{handle}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize_platform(s).ok_or_else(|| AppError::UnknownPlatform(s.to_string()))
    }
}

impl TryFrom<String> for Platform {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.canonical_name().to_string()
    }
}
