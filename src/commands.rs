use crate::cli::Args;
use crate::config::{Config, Handles};
use crate::data_fetcher::api::{
    ContestAggregate, ContestAggregator, ProfileAggregate, build_transport, fetch_profiles,
};
use crate::error::AppError;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Everything one run produced. Sections that were not requested are omitted.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contests: Option<ContestAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<ProfileAggregate>,
}

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use both --set-log-file and --clear-log-file",
        ));
    }
    if args.upcoming && !args.wants_contests() {
        return Err(AppError::config_error(
            "--upcoming only applies to contests; add --contests",
        ));
    }
    Ok(())
}

/// Handles the --version command.
pub fn handle_version_command() {
    println!("{} {}", crate::NAME, crate::VERSION);
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-handle, --set-log-file, --clear-log-file).
///
/// Updates configuration based on the provided arguments and saves changes.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            warn!("Existing config unusable, starting from defaults: {}", e);
            Config::default()
        }
    };

    if let Some((platform, handle)) = &args.set_handle {
        config.handles.set(*platform, handle.clone())?;
        println!("{platform} handle set to {handle}");
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Configured handles with the one-off `--handle` overrides applied
pub fn effective_handles(config: &Config, args: &Args) -> Result<Handles, AppError> {
    let mut handles = config.handles.clone();
    for (platform, handle) in &args.handles {
        handles.set(*platform, handle.clone())?;
    }
    Ok(handles)
}

/// Runs the requested aggregations and collects them into one output.
pub async fn run_aggregation(config: &Config, args: &Args) -> Result<RunOutput, AppError> {
    let contests = if args.wants_contests() {
        let transport = build_transport(config)?;
        let aggregate = ContestAggregator::from_config(config, transport)
            .with_upcoming_only(args.upcoming)
            .aggregate(Utc::now())
            .await;
        Some(aggregate)
    } else {
        None
    };

    let profiles = if args.wants_profiles() {
        let handles = effective_handles(config, args)?;
        let pairs = handles.iter();
        if pairs.is_empty() {
            warn!("No handles configured; use --set-handle or --handle");
        }
        Some(fetch_profiles(config, &pairs).await?)
    } else {
        None
    };

    Ok(RunOutput { contests, profiles })
}

/// Handles the default command: aggregate and print JSON to stdout.
pub async fn handle_aggregate_command(args: &Args) -> Result<(), AppError> {
    let config = Config::load().await?;
    info!("Config loaded successfully");

    let output = run_aggregation(&config, args).await?;
    let json = if args.compact_json {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{json}");
    Ok(())
}
