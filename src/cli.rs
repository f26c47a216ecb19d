use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

use crate::data_fetcher::models::Platform;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Parses `PLATFORM=HANDLE`, accepting any platform alias
pub fn parse_handle_arg(raw: &str) -> Result<(Platform, String), String> {
    let (platform, handle) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PLATFORM=HANDLE, got '{raw}'"))?;
    let platform = platform
        .parse::<Platform>()
        .map_err(|e| e.to_string())?;
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(format!("empty handle for {platform}"));
    }
    Ok((platform, handle.to_string()))
}

/// Returns true when the arguments only touch configuration or print info
pub fn is_config_mode(args: &Args) -> bool {
    args.list_config
        || args.set_handle.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.version
}

/// Competitive programming contest and profile aggregator
///
/// Fetches upcoming contests from kontests.net, Codeforces, LeetCode and
/// CodeChef, and coding-profile statistics for the configured handles.
/// Unreachable sources fall back to cached snapshots, configured baselines
/// and synthesized recurring contests. The result is printed as JSON.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
pub struct Args {
    /// Aggregate contests. This is the default when --profiles is not given.
    #[arg(long, help_heading = "Aggregation")]
    pub contests: bool,

    /// Aggregate coding profiles for the configured handles.
    #[arg(long, help_heading = "Aggregation")]
    pub profiles: bool,

    /// Use this handle for one run without saving it, e.g. `codeforces=tourist`.
    /// Can be repeated. Implies --profiles.
    #[arg(
        long = "handle",
        value_name = "PLATFORM=HANDLE",
        value_parser = parse_handle_arg,
        help_heading = "Aggregation"
    )]
    pub handles: Vec<(Platform, String)>,

    /// Only include contests that have not finished yet.
    #[arg(long, help_heading = "Output")]
    pub upcoming: bool,

    /// Print JSON on a single line instead of pretty-printed.
    #[arg(long = "compact-json", help_heading = "Output")]
    pub compact_json: bool,

    /// Save a platform handle in config, e.g. `leetcode=alice`.
    #[arg(
        long = "set-handle",
        value_name = "PLATFORM=HANDLE",
        value_parser = parse_handle_arg,
        help_heading = "Configuration"
    )]
    pub set_handle: Option<(Platform, String)>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Show version information
    #[arg(short = 'V', long = "version", help_heading = "Info")]
    pub version: bool,

    /// Also write logs to stderr at debug verbosity.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

impl Args {
    pub fn wants_contests(&self) -> bool {
        self.contests || !self.wants_profiles()
    }

    pub fn wants_profiles(&self) -> bool {
        self.profiles || !self.handles.is_empty()
    }
}
