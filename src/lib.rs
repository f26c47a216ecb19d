//! Competitive programming contest and coding-profile aggregator
//!
//! This library fetches upcoming contests and per-handle profile statistics
//! from several providers, normalizes them into one shape and keeps answering
//! when providers are down by falling back to snapshots, configured baselines
//! and synthesized recurring contests.
//!
//! # Examples
//!
//! ```rust,no_run
//! use codefolio::{AppError, Config, Platform, fetch_contests, fetch_profiles};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!
//!     let contests = fetch_contests(&config).await?;
//!     for contest in &contests.contests {
//!         println!("{} {} {}", contest.platform, contest.start, contest.name);
//!     }
//!
//!     let profiles = fetch_profiles(&config, &[(Platform::CodeForces, "tourist")]).await?;
//!     println!("solved: {}", profiles.totals.problems_solved);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::{ContestAggregate, ProfileAggregate, fetch_contests, fetch_profiles};
pub use data_fetcher::models::{
    ContestPhase, NormalizedCodingProfile, NormalizedContest, Platform, ProfileSource,
};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
