pub mod normalize;
pub mod rank_tier;
pub mod time_parsing;
pub mod trend;

pub use normalize::{
    canonicalize_platform, contest_id, dedup_name, merge_contests, merge_profiles,
};
pub use rank_tier::{UNRATED, approximate_codeforces_global_rank, rank_tier};
pub use time_parsing::{from_unix_seconds, parse_provider_timestamp};
pub use trend::trend_from_history;
