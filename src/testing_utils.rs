//! Test utilities: a scripted transport and builders for normalized records

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::data_fetcher::api::transport::{Transport, status_error};
use crate::data_fetcher::models::{
    NormalizedCodingProfile, NormalizedContest, Platform, ProfileSource,
};
use crate::error::AppError;

/// What the fake transport answers for one URL
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 2xx with this body
    Ok(String),
    /// Non-success status code
    Status(u16),
    /// Network-level timeout
    Timeout,
    /// Never answers; only an adapter timeout ends the call
    Hang,
    /// Answers with the body after a delay
    Delayed(String, std::time::Duration),
}

impl FakeReply {
    pub fn ok(body: impl Into<String>) -> Self {
        FakeReply::Ok(body.into())
    }

    pub fn json(value: serde_json::Value) -> Self {
        FakeReply::Ok(value.to_string())
    }

    pub fn status(code: u16) -> Self {
        FakeReply::Status(code)
    }
}

/// In-memory [`Transport`] answering from a URL → reply table.
///
/// Unknown URLs answer 404. Every call is recorded as `"GET <url>"` or
/// `"POST <url>"`.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: HashMap<String, FakeReply>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: impl Into<String>, reply: FakeReply) -> Self {
        self.replies.insert(url.into(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    async fn answer(&self, verb: &str, url: &str) -> Result<String, AppError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{verb} {url}"));
        }
        match self.replies.get(url).cloned() {
            Some(FakeReply::Ok(body)) => Ok(body),
            Some(FakeReply::Status(code)) => Err(status_error(code, "scripted", url)),
            Some(FakeReply::Timeout) => Err(AppError::network_timeout(url)),
            Some(FakeReply::Hang) => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Err(AppError::network_timeout(url))
            }
            Some(FakeReply::Delayed(body, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            None => Err(AppError::api_not_found(url)),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_text(&self, url: &str) -> Result<String, AppError> {
        self.answer("GET", url).await
    }

    async fn post_json_text(
        &self,
        url: &str,
        _body: &serde_json::Value,
    ) -> Result<String, AppError> {
        self.answer("POST", url).await
    }
}

/// Builders for normalized records used across tests
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// A two-hour live contest
    pub fn contest(platform: Platform, name: &str, start: DateTime<Utc>) -> NormalizedContest {
        NormalizedContest::new(
            platform,
            name,
            start,
            Duration::hours(2).num_seconds(),
            format!("https://{}.example/{}", platform.slug(), name.replace(' ', "-")),
        )
    }

    /// `count` contests on one platform, one day apart starting at `first`
    pub fn contest_series(
        platform: Platform,
        count: usize,
        first: DateTime<Utc>,
    ) -> Vec<NormalizedContest> {
        (0..count)
            .map(|i| {
                Self::contest(
                    platform,
                    &format!("Round {}", 900 + i),
                    first + Duration::days(i as i64),
                )
            })
            .collect()
    }

    /// A live profile with populated stats
    pub fn profile(platform: Platform, handle: &str, rating: i64) -> NormalizedCodingProfile {
        let mut profile = NormalizedCodingProfile::new(platform, handle);
        profile.rating = rating;
        profile.peak_rating = rating;
        profile.rank = crate::data_fetcher::processors::rank_tier(platform, rating);
        profile.problems_solved = 100;
        profile.contests_attended = 10;
        profile.source = ProfileSource::Live;
        profile
    }
}
