//! Generic fetch helpers shared by the source adapters: JSON decoding with
//! error classification, GraphQL posting and adapter-level timeouts.

use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{error, instrument, warn};

use super::transport::Transport;
use crate::error::AppError;

/// Decodes a response body, classifying failures the same way for every
/// provider.
///
/// - empty body → `ApiNoData`
/// - body that is not a JSON object or array → `ApiMalformedJson`
/// - valid JSON in the wrong shape → `ApiUnexpectedStructure`
pub fn parse_json<T: DeserializeOwned>(text: &str, url: &str) -> Result<T, AppError> {
    match serde_json::from_str::<T>(text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                text.chars().take(200).collect::<String>()
            );

            let trimmed = text.trim_start();
            if trimmed.is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}

/// GET `url` and decode the JSON body
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, AppError> {
    let text = transport.get_text(url).await?;
    parse_json(&text, url)
}

/// Envelope every GraphQL response arrives in
#[derive(Debug, serde::Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, serde::Deserialize)]
struct GraphQlError {
    message: String,
}

/// POST a GraphQL query and unwrap the `data` member.
///
/// A response that carries `errors` and no `data` is a provider failure.
#[instrument(skip(transport, query, variables))]
pub async fn post_graphql<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
    query: &str,
    variables: serde_json::Value,
) -> Result<T, AppError> {
    let body = serde_json::json!({ "query": query, "variables": variables });
    let text = transport.post_json_text(url, &body).await?;
    let response: GraphQlResponse<T> = parse_json(&text, url)?;

    match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!(
                    "GraphQL response from {} carried {} partial errors",
                    url,
                    response.errors.len()
                );
            }
            Ok(data)
        }
        None => {
            let message = response
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            if message.is_empty() {
                Err(AppError::api_no_data("GraphQL response has no data", url))
            } else {
                Err(AppError::provider_status(url, message))
            }
        }
    }
}

/// Runs an adapter fetch under its own deadline. Dropping the inner future on
/// expiry cancels whatever request was in flight.
pub async fn with_timeout<T, F>(adapter: &str, timeout: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Adapter {} timed out after {:?}", adapter, timeout);
            Err(AppError::adapter_timeout(adapter, timeout))
        }
    }
}
