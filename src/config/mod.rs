use crate::constants::{self, adapter_timeouts, contests, endpoints, env_vars, snapshots};
use crate::data_fetcher::models::{Platform, ProfileBaseline, RecurringContest};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
///
/// Plain values come first and tables after so the TOML output stays valid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Overall HTTP client timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Platform handles whose profiles are aggregated
    #[serde(default)]
    pub handles: Handles,
    #[serde(default)]
    pub timeouts: AdapterTimeouts,
    #[serde(default)]
    pub aggregation: AggregationSettings,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Last-known profile values used when every live source and the cache fail
    #[serde(default, rename = "baseline")]
    pub baselines: Vec<ProfileBaseline>,
    /// Weekly contests synthesized when live contest sources come back short
    #[serde(default)]
    pub recurring: Vec<RecurringContest>,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

/// One optional handle per platform with a profile adapter
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Handles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeforces: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codechef: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geeksforgeeks: Option<String>,
}

impl Handles {
    pub fn get(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::LeetCode => self.leetcode.as_deref(),
            Platform::CodeForces => self.codeforces.as_deref(),
            Platform::CodeChef => self.codechef.as_deref(),
            Platform::GeeksforGeeks => self.geeksforgeeks.as_deref(),
            _ => None,
        }
    }

    /// Sets the handle for a platform. Fails for platforms without a profile adapter.
    pub fn set(&mut self, platform: Platform, handle: impl Into<String>) -> Result<(), AppError> {
        let slot = match platform {
            Platform::LeetCode => &mut self.leetcode,
            Platform::CodeForces => &mut self.codeforces,
            Platform::CodeChef => &mut self.codechef,
            Platform::GeeksforGeeks => &mut self.geeksforgeeks,
            other => {
                return Err(AppError::config_error(format!(
                    "No profile support for {other}"
                )));
            }
        };
        *slot = Some(handle.into());
        Ok(())
    }

    /// Configured (platform, handle) pairs in platform order
    pub fn iter(&self) -> Vec<(Platform, &str)> {
        Platform::WITH_PROFILES
            .iter()
            .filter_map(|platform| self.get(*platform).map(|handle| (*platform, handle)))
            .collect()
    }
}

/// Per-adapter timeouts in seconds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AdapterTimeouts {
    pub contest_seconds: u64,
    pub profile_seconds: u64,
    pub alternate_seconds: u64,
}

impl Default for AdapterTimeouts {
    fn default() -> Self {
        Self {
            contest_seconds: adapter_timeouts::CONTEST_SECONDS,
            profile_seconds: adapter_timeouts::PROFILE_SECONDS,
            alternate_seconds: adapter_timeouts::ALTERNATE_SECONDS,
        }
    }
}

impl AdapterTimeouts {
    pub fn contest(&self) -> Duration {
        Duration::from_secs(self.contest_seconds)
    }

    pub fn profile(&self) -> Duration {
        Duration::from_secs(self.profile_seconds)
    }

    pub fn alternate(&self) -> Duration {
        Duration::from_secs(self.alternate_seconds)
    }
}

/// Thresholds for the aggregation and fallback layers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AggregationSettings {
    pub min_contest_count: usize,
    pub relevance_window_days: i64,
    /// Platforms whose absence from the merged contests triggers synthesis
    pub required_platforms: Vec<Platform>,
    pub snapshot_ttl_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            min_contest_count: contests::MIN_COUNT,
            relevance_window_days: contests::RELEVANCE_WINDOW_DAYS,
            required_platforms: vec![Platform::LeetCode],
            snapshot_ttl_seconds: snapshots::TTL_SECONDS,
            snapshot_path: None,
        }
    }
}

impl AggregationSettings {
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_seconds)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(paths::get_snapshot_path)
    }
}

/// Upstream base URLs. Overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub kontests: String,
    pub codeforces: String,
    pub codeforces_mirror: String,
    pub leetcode: String,
    pub leetcode_stats: String,
    pub codechef: String,
    pub codechef_stats: String,
    pub geeksforgeeks: String,
    pub geeksforgeeks_auth: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            kontests: endpoints::KONTESTS.to_string(),
            codeforces: endpoints::CODEFORCES.to_string(),
            codeforces_mirror: endpoints::CODEFORCES_MIRROR.to_string(),
            leetcode: endpoints::LEETCODE.to_string(),
            leetcode_stats: endpoints::LEETCODE_STATS.to_string(),
            codechef: endpoints::CODECHEF.to_string(),
            codechef_stats: endpoints::CODECHEF_STATS.to_string(),
            geeksforgeeks: endpoints::GEEKSFORGEEKS.to_string(),
            geeksforgeeks_auth: endpoints::GEEKSFORGEEKS_AUTH.to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint with its config key, for validation and display
    pub fn iter(&self) -> [(&'static str, &str); 9] {
        [
            ("kontests", &self.kontests),
            ("codeforces", &self.codeforces),
            ("codeforces_mirror", &self.codeforces_mirror),
            ("leetcode", &self.leetcode),
            ("leetcode_stats", &self.leetcode_stats),
            ("codechef", &self.codechef),
            ("codechef_stats", &self.codechef_stats),
            ("geeksforgeeks", &self.geeksforgeeks),
            ("geeksforgeeks_auth", &self.geeksforgeeks_auth),
        ]
    }

    /// Points every endpoint at one base URL. Used with a local mock server.
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            kontests: base.clone(),
            codeforces: base.clone(),
            codeforces_mirror: base.clone(),
            leetcode: base.clone(),
            leetcode_stats: base.clone(),
            codechef: base.clone(),
            codechef_stats: base.clone(),
            geeksforgeeks: base.clone(),
            geeksforgeeks_auth: base,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            handles: Handles::default(),
            timeouts: AdapterTimeouts::default(),
            aggregation: AggregationSettings::default(),
            endpoints: Endpoints::default(),
            baselines: Vec::new(),
            recurring: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file yields the defaults. Environment variables can override
    /// config file values.
    ///
    /// # Environment Variables
    /// - `CODEFOLIO_LOG_FILE` - Override log file path
    /// - `CODEFOLIO_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `CODEFOLIO_SNAPSHOT_PATH` - Override the snapshot file location
    /// - `CODEFOLIO_<PLATFORM>_HANDLE` - Override a platform handle
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(snapshot_path) = std::env::var(env_vars::SNAPSHOT_PATH) {
            self.aggregation.snapshot_path = Some(snapshot_path);
        }

        let handle_vars = [
            (Platform::LeetCode, env_vars::LEETCODE_HANDLE),
            (Platform::CodeForces, env_vars::CODEFORCES_HANDLE),
            (Platform::CodeChef, env_vars::CODECHEF_HANDLE),
            (Platform::GeeksforGeeks, env_vars::GEEKSFORGEEKS_HANDLE),
        ];
        for (platform, var) in handle_vars {
            if let Ok(handle) = std::env::var(var) {
                self.handles.set(platform, handle.trim())?;
            }
        }

        Ok(())
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Recurring templates, or the built-in ones when none are configured
    pub fn recurring_templates(&self) -> Vec<RecurringContest> {
        if self.recurring.is_empty() {
            RecurringContest::defaults()
        } else {
            self.recurring.clone()
        }
    }

    /// Configured baseline for a platform, if any
    pub fn baseline_for(&self, platform: Platform) -> Option<&ProfileBaseline> {
        self.baselines.iter().find(|b| b.platform == platform)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if !Path::new(&config_path).exists() {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("(Defaults are in effect)");
            return Ok(());
        }

        let config = Config::load().await?;
        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        println!("────────────────────────────────────");
        println!("Handles:");
        let handles = config.handles.iter();
        if handles.is_empty() {
            println!("(none configured)");
        }
        for (platform, handle) in handles {
            println!("{platform}: {handle}");
        }
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!(
            "Adapter Timeouts: contests {}s, profiles {}s, alternates {}s",
            config.timeouts.contest_seconds,
            config.timeouts.profile_seconds,
            config.timeouts.alternate_seconds
        );
        println!("────────────────────────────────────");
        println!("Snapshot File:");
        println!("{}", config.aggregation.snapshot_path().display());
        println!(
            "Snapshot TTL: {} seconds",
            config.aggregation.snapshot_ttl_seconds
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/codefolio.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent directory
    /// if it doesn't exist.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serial_test::serial;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
log_file_path = "/custom/log/path"

[handles]
codeforces = "tourist"
leetcode = "someone"

[aggregation]
min_contest_count = 3

[[baseline]]
platform = "codeforces"
rating = 1850
problems_solved = 400

[[recurring]]
name = "AtCoder Beginner Contest"
platform = "AtCoder"
weekday = "Sat"
hour = 12
duration_minutes = 100
url = "https://atcoder.jp/contests/"
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.handles.get(Platform::CodeForces), Some("tourist"));
        assert_eq!(config.handles.get(Platform::CodeChef), None);
        assert_eq!(config.aggregation.min_contest_count, 3);
        assert_eq!(
            config.aggregation.relevance_window_days,
            contests::RELEVANCE_WINDOW_DAYS
        );
        assert_eq!(config.baselines.len(), 1);
        assert_eq!(
            config.baseline_for(Platform::CodeForces).unwrap().rating,
            1850
        );
        assert_eq!(config.recurring[0].weekday, Weekday::Sat);
        assert_eq!(config.endpoints, Endpoints::default());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_config_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let mut original = Config::default();
        original.log_file_path = Some("/custom/log/path".to_string());
        original.handles.set(Platform::CodeChef, "chef").unwrap();
        original.baselines.push(ProfileBaseline {
            platform: Platform::CodeChef,
            rating: 1700,
            peak_rating: 1800,
            rank: Some("3★".to_string()),
            problems_solved: 250,
            contests_attended: 30,
            global_rank: Some(12000),
        });
        original.recurring = RecurringContest::defaults();

        original.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "handles = [1, 2, \"unclosed")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_unknown_platform_is_rejected() {
        let content = r#"
[[baseline]]
platform = "kaggle"
rating = 1
"#;
        let result: Result<Config, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("codefolio"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("codefolio"));
        assert!(log_dir_path.ends_with("logs"));
    }

    #[test]
    fn test_handles_set_rejects_platform_without_profiles() {
        let mut handles = Handles::default();
        assert!(handles.set(Platform::AtCoder, "someone").is_err());
        handles.set(Platform::GeeksforGeeks, "geek").unwrap();
        assert_eq!(handles.iter(), vec![(Platform::GeeksforGeeks, "geek")]);
    }

    #[test]
    fn test_recurring_templates_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.recurring_templates(), RecurringContest::defaults());
    }

    #[test]
    fn test_config_validation_invalid_configs() {
        let mut zero_timeout = Config::default();
        zero_timeout.timeouts.contest_seconds = 0;

        let mut bad_endpoint = Config::default();
        bad_endpoint.endpoints.kontests = "kontests.net".to_string();

        let mut blank_handle = Config::default();
        blank_handle.handles.leetcode = Some("  ".to_string());

        let mut bad_template = Config::default();
        bad_template.recurring = RecurringContest::defaults();
        bad_template.recurring[0].hour = 24;

        let mut empty_log_path = Config::default();
        empty_log_path.log_file_path = Some(String::new());

        let mut zero_window = Config::default();
        zero_window.aggregation.relevance_window_days = 0;

        let mut huge_window = Config::default();
        huge_window.aggregation.relevance_window_days = i64::MAX;

        for config in [
            zero_timeout,
            bad_endpoint,
            blank_handle,
            bad_template,
            empty_log_path,
            zero_window,
            huge_window,
        ] {
            assert!(
                config.validate().is_err(),
                "Config should be invalid: {config:?}"
            );
        }
    }

    #[test]
    fn test_config_validation_window_upper_bound() {
        let mut config = Config::default();
        config.aggregation.relevance_window_days = contests::MAX_RELEVANCE_WINDOW_DAYS;
        assert!(config.validate().is_ok());

        config.aggregation.relevance_window_days += 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoints_all_at_trims_trailing_slash() {
        let endpoints = Endpoints::all_at("http://127.0.0.1:9999/");
        assert!(endpoints.iter().iter().all(|(_, url)| *url == "http://127.0.0.1:9999"));
    }

    #[test]
    #[serial]
    fn test_environment_variable_override() {
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "3");
            std::env::set_var(env_vars::CODEFORCES_HANDLE, " tourist ");
            std::env::set_var(env_vars::SNAPSHOT_PATH, "/tmp/codefolio-test/snapshots.json");
        }

        let mut config = Config::default();
        let result = config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
            std::env::remove_var(env_vars::CODEFORCES_HANDLE);
            std::env::remove_var(env_vars::SNAPSHOT_PATH);
        }

        result.unwrap();
        assert_eq!(config.http_timeout_seconds, 3);
        assert_eq!(config.handles.get(Platform::CodeForces), Some("tourist"));
        assert_eq!(
            config.aggregation.snapshot_path(),
            PathBuf::from("/tmp/codefolio-test/snapshots.json")
        );
    }
}
