//! GeeksforGeeks profile: the community API and the auth API as alternate.
//!
//! GeeksforGeeks has no contest rating, so rating stays 0 and the tier
//! "Unrated" on both paths.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use super::{AdapterContext, ProfileAdapter, lenient_u64};
use crate::data_fetcher::api::fetch_utils::fetch_json;
use crate::data_fetcher::api::urls::{build_geeksforgeeks_auth_url, build_handle_url};
use crate::data_fetcher::models::{NormalizedCodingProfile, Platform};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct CommunityResponse {
    info: Option<CommunityInfo>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommunityInfo {
    #[serde(default)]
    total_problems_solved: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    data: Option<AuthData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    #[serde(default)]
    total_problems_solved: serde_json::Value,
}

fn profile_with_solved(handle: &str, solved: &serde_json::Value) -> NormalizedCodingProfile {
    let mut profile = NormalizedCodingProfile::new(Platform::GeeksforGeeks, handle);
    profile.problems_solved = lenient_u64(solved).unwrap_or(0);
    profile
}

pub struct GeeksforGeeksProfileAdapter {
    ctx: AdapterContext,
}

impl GeeksforGeeksProfileAdapter {
    pub const NAME: &'static str = "geeksforgeeks-profile";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for GeeksforGeeksProfileAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::GeeksforGeeks
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let url = build_handle_url(&self.ctx.base_url, handle);
        let response: CommunityResponse = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        match response.info {
            Some(info) => Ok(profile_with_solved(handle, &info.total_problems_solved)),
            None => Err(AppError::provider_status(
                Self::NAME,
                response
                    .error
                    .unwrap_or_else(|| "response has no info".to_string()),
            )),
        }
    }
}

pub struct GeeksforGeeksAuthAdapter {
    ctx: AdapterContext,
}

impl GeeksforGeeksAuthAdapter {
    pub const NAME: &'static str = "geeksforgeeks-auth";

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ProfileAdapter for GeeksforGeeksAuthAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn platform(&self) -> Platform {
        Platform::GeeksforGeeks
    }

    fn timeout(&self) -> Duration {
        self.ctx.timeout
    }

    #[instrument(skip(self))]
    async fn fetch_unbounded(&self, handle: &str) -> Result<NormalizedCodingProfile, AppError> {
        let url = build_geeksforgeeks_auth_url(&self.ctx.base_url, handle);
        let response: AuthResponse = fetch_json(self.ctx.transport.as_ref(), &url).await?;
        match response.data {
            Some(data) => Ok(profile_with_solved(handle, &data.total_problems_solved)),
            None => Err(AppError::provider_status(
                Self::NAME,
                response
                    .message
                    .unwrap_or_else(|| "response has no data".to_string()),
            )),
        }
    }
}
