// src/main.rs
use clap::Parser;
use codefolio::cli::{Args, is_config_mode};
use codefolio::commands::{
    handle_aggregate_command, handle_config_update_command, handle_list_config_command,
    handle_version_command, validate_args,
};
use codefolio::error::AppError;
use codefolio::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Validate argument combinations
    validate_args(&args)?;

    // Handle version flag first
    if args.version {
        handle_version_command();
        return Ok(());
    }

    // The guard must be kept alive for the duration of the program
    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return handle_list_config_command().await;
    }

    if is_config_mode(&args) {
        return handle_config_update_command(&args).await;
    }

    handle_aggregate_command(&args).await
}
