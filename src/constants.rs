//! Application-wide constants and configuration defaults
//!
//! Every value here is a default; most of them can be overridden from the
//! config file or environment.

/// Default timeout for the HTTP client in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// User agent sent to every upstream provider
pub const USER_AGENT: &str = concat!("codefolio/", env!("CARGO_PKG_VERSION"));

/// Per-adapter timeouts in seconds
pub mod adapter_timeouts {
    /// Contest listing adapters
    pub const CONTEST_SECONDS: u64 = 8;

    /// Primary profile adapters
    pub const PROFILE_SECONDS: u64 = 10;

    /// Alternate profile endpoints, tried only after the primary failed
    pub const ALTERNATE_SECONDS: u64 = 5;
}

/// Contest aggregation thresholds
pub mod contests {
    /// Below this many relevant contests the fallback synthesizes recurring ones
    pub const MIN_COUNT: usize = 5;

    /// Contests that ended more than this many days ago are dropped
    pub const RELEVANCE_WINDOW_DAYS: i64 = 60;

    /// Upper bound accepted for `relevance_window_days` (ten years)
    pub const MAX_RELEVANCE_WINDOW_DAYS: i64 = 3650;

    /// Longest contest duration accepted from a provider (one year).
    /// Longer listings are treated as malformed and skipped.
    pub const MAX_DURATION_SECONDS: i64 = 366 * 24 * 60 * 60;
}

/// Snapshot cache settings
pub mod snapshots {
    /// A snapshot younger than this is fresh (1 hour)
    pub const TTL_SECONDS: u64 = 3600;

    /// Capacity of the in-memory snapshot cache
    pub const MEMORY_CAPACITY: usize = 64;

    /// File name of the persisted snapshot store
    pub const FILE_NAME: &str = "snapshots.json";
}

/// Retry configuration for the HTTP transport
pub mod retry {
    /// Maximum number of retries after the first attempt
    pub const MAX_RETRIES: u32 = 1;

    /// Initial backoff between attempts (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Upper bound for a Retry-After header we are willing to honor (seconds)
    pub const MAX_RETRY_AFTER_SECONDS: u64 = 5;
}

/// Default upstream base URLs
pub mod endpoints {
    pub const KONTESTS: &str = "https://kontests.net";
    pub const CODEFORCES: &str = "https://codeforces.com";
    pub const CODEFORCES_MIRROR: &str = "https://mirror.codeforces.com";
    pub const LEETCODE: &str = "https://leetcode.com";
    pub const LEETCODE_STATS: &str = "https://leetcode-stats-api.herokuapp.com";
    pub const CODECHEF: &str = "https://www.codechef.com";
    pub const CODECHEF_STATS: &str = "https://codechef-api.vercel.app";
    pub const GEEKSFORGEEKS: &str = "https://geeks-for-geeks-api.vercel.app";
    pub const GEEKSFORGEEKS_AUTH: &str = "https://authapi.geeksforgeeks.org";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "CODEFOLIO_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "CODEFOLIO_HTTP_TIMEOUT";

    /// Environment variable for the snapshot file location
    pub const SNAPSHOT_PATH: &str = "CODEFOLIO_SNAPSHOT_PATH";

    /// Per-platform handle overrides
    pub const LEETCODE_HANDLE: &str = "CODEFOLIO_LEETCODE_HANDLE";
    pub const CODEFORCES_HANDLE: &str = "CODEFOLIO_CODEFORCES_HANDLE";
    pub const CODECHEF_HANDLE: &str = "CODEFOLIO_CODECHEF_HANDLE";
    pub const GEEKSFORGEEKS_HANDLE: &str = "CODEFOLIO_GEEKSFORGEEKS_HANDLE";
}
