//! End-to-end aggregation against a local mock server standing in for every provider

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};
use codefolio::config::{AggregationSettings, Endpoints};
use codefolio::data_fetcher::models::TrendDirection;
use codefolio::{Config, Platform, ProfileSource, fetch_contests, fetch_profiles};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, snapshot_dir: &TempDir) -> Config {
    let mut config = Config {
        endpoints: Endpoints::all_at(&server.uri()),
        aggregation: AggregationSettings {
            snapshot_path: Some(
                snapshot_dir
                    .path()
                    .join("snapshots.json")
                    .to_string_lossy()
                    .to_string(),
            ),
            ..AggregationSettings::default()
        },
        ..Config::default()
    };
    config.timeouts.contest_seconds = 2;
    config.timeouts.profile_seconds = 2;
    config.timeouts.alternate_seconds = 2;
    config
}

/// Two days out, truncated to the minute so both providers agree on it
fn upcoming_start() -> DateTime<Utc> {
    let start = Utc::now() + Duration::days(2);
    start
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap()
}

async fn mount_codeforces_user(server: &MockServer, handle: &str, rating: i64) {
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .and(query_param("handles", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{"handle": handle, "rating": rating, "maxRating": rating + 50}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user.rating"))
        .and(query_param("handle", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{"newRating": 1500}, {"newRating": 1700}, {"newRating": rating}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user.status"))
        .and(query_param("handle", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [
                {"problem": {"contestId": 1, "index": "A", "name": "Sum"}, "verdict": "OK"},
                {"problem": {"contestId": 1, "index": "A", "name": "Sum"}, "verdict": "OK"},
                {"problem": {"contestId": 1, "index": "B", "name": "Path"}, "verdict": "WRONG_ANSWER"},
                {"problem": {"contestId": 2, "index": "C", "name": "Tree"}, "verdict": "OK"}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_duplicate_round_resolves_to_kontests_record() {
    let server = MockServer::start().await;
    let snapshots = TempDir::new().unwrap();
    let start = upcoming_start();

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "Codeforces Round 900 (Div. 2)",
            "url": "https://codeforces.com/contests/1875",
            "start_time": start.to_rfc3339_opts(SecondsFormat::Millis, true),
            "end_time": (start + Duration::hours(2)).to_rfc3339_opts(SecondsFormat::Millis, true),
            "duration": "7200.0",
            "site": "CodeForces"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/contest.list"))
        .and(query_param("gym", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [
                {"id": 1875, "name": "Codeforces Round  900 (Div. 2)", "phase": "BEFORE",
                 "durationSeconds": 7200, "startTimeSeconds": start.timestamp()},
                {"id": 1876, "name": "Educational Round 160", "phase": "BEFORE",
                 "durationSeconds": 7200, "startTimeSeconds": (start + Duration::days(1)).timestamp()}
            ]
        })))
        .mount(&server)
        .await;

    let aggregate = fetch_contests(&test_config(&server, &snapshots)).await.unwrap();

    let rounds: Vec<_> = aggregate
        .contests
        .iter()
        .filter(|c| c.name.contains("900"))
        .collect();
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0].name, "Codeforces Round 900 (Div. 2)");
    assert_eq!(rounds[0].url, "https://codeforces.com/contests/1875");
    assert!(aggregate.contests.iter().any(|c| c.name == "Educational Round 160"));
    assert_eq!(aggregate.sources, vec!["kontests", "codeforces"]);
    assert_eq!(aggregate.reports.len(), 4);
}

#[tokio::test]
async fn test_all_sources_failing_still_yields_sorted_contests() {
    let server = MockServer::start().await;
    let snapshots = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let aggregate = fetch_contests(&test_config(&server, &snapshots)).await.unwrap();

    assert!(!aggregate.contests.is_empty());
    assert!(aggregate.sources.is_empty());
    assert!(aggregate.fallback_applied);
    assert!(aggregate.contests.iter().all(|c| c.synthesized));
    assert!(
        aggregate
            .contests
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start)
    );
    assert!(
        aggregate
            .contests
            .iter()
            .all(|c| aggregate.window.contains(c))
    );
    assert!(
        aggregate
            .contests
            .iter()
            .any(|c| c.platform == Platform::LeetCode)
    );
    assert!(aggregate.reports.iter().all(|r| !r.succeeded()));
}

#[tokio::test]
async fn test_codeforces_profile_from_live_api() {
    let server = MockServer::start().await;
    let snapshots = TempDir::new().unwrap();
    mount_codeforces_user(&server, "tourist", 1850).await;

    let aggregate = fetch_profiles(
        &test_config(&server, &snapshots),
        &[(Platform::CodeForces, "tourist")],
    )
    .await
    .unwrap();

    assert_eq!(aggregate.profiles.len(), 1);
    let profile = &aggregate.profiles[0];
    assert_eq!(profile.rank, "Expert");
    assert_eq!(profile.rating, 1850);
    assert_eq!(profile.peak_rating, 1900);
    assert_eq!(profile.problems_solved, 2);
    assert_eq!(profile.contests_attended, 3);
    assert_eq!(profile.trend.direction, TrendDirection::Up);
    assert_eq!(profile.source, ProfileSource::Live);
    assert_eq!(aggregate.sources, vec!["codeforces-profile"]);
}

#[tokio::test]
async fn test_snapshot_file_serves_profile_when_providers_go_down() {
    let snapshots = TempDir::new().unwrap();

    let healthy = MockServer::start().await;
    mount_codeforces_user(&healthy, "tourist", 1850).await;
    let first = fetch_profiles(
        &test_config(&healthy, &snapshots),
        &[(Platform::CodeForces, "tourist")],
    )
    .await
    .unwrap();
    assert_eq!(first.profiles[0].source, ProfileSource::Live);
    assert!(snapshots.path().join("snapshots.json").exists());

    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&broken)
        .await;
    let second = fetch_profiles(
        &test_config(&broken, &snapshots),
        &[(Platform::CodeForces, "tourist")],
    )
    .await
    .unwrap();

    let profile = &second.profiles[0];
    assert_eq!(profile.source, ProfileSource::Cache);
    assert_eq!(profile.rating, 1850);
    assert_eq!(profile.rank, "Expert");
    assert!(second.sources.is_empty());
}

#[tokio::test]
async fn test_unknown_handle_without_fallbacks_is_reported() {
    let server = MockServer::start().await;
    let snapshots = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let aggregate = fetch_profiles(
        &test_config(&server, &snapshots),
        &[(Platform::GeeksforGeeks, "nobody")],
    )
    .await
    .unwrap();

    let profile = &aggregate.profiles[0];
    assert!(profile.is_error());
    assert_eq!(profile.source, ProfileSource::None);
    assert_eq!(profile.rating, 0);
    assert_eq!(aggregate.totals.live_platforms, 0);
}
