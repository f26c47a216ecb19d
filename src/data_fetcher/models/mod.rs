pub mod contest;
pub mod platform;
pub mod profile;

pub use contest::{ContestPhase, NormalizedContest, RecurringContest};
pub use platform::Platform;
pub use profile::{
    GlobalRank, NormalizedCodingProfile, ProfileBaseline, ProfileSource, Trend, TrendDirection,
};
