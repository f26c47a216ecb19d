pub mod adapters;
pub mod api;
pub mod cache;
pub mod fallback;
pub mod models;
pub mod processors;

pub use api::{fetch_contests, fetch_profiles};
pub use models::{NormalizedCodingProfile, NormalizedContest, Platform};
