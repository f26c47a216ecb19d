use crate::config::Config;
use crate::constants::contests::MAX_RELEVANCE_WINDOW_DAYS;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - HTTP and adapter timeouts must be positive
/// - The relevance window must be between one day and ten years
/// - Endpoints must be http(s) URLs
/// - Configured handles cannot be empty or contain whitespace
/// - Recurring templates need a valid hour/minute and a positive duration
/// - If log file path is provided, it cannot be empty and its parent must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be greater than zero"));
    }

    let timeouts = &config.timeouts;
    if timeouts.contest_seconds == 0
        || timeouts.profile_seconds == 0
        || timeouts.alternate_seconds == 0
    {
        return Err(AppError::config_error(
            "Adapter timeouts must be greater than zero",
        ));
    }

    if config.aggregation.relevance_window_days <= 0 {
        return Err(AppError::config_error(
            "Relevance window must be at least one day",
        ));
    }
    if config.aggregation.relevance_window_days > MAX_RELEVANCE_WINDOW_DAYS {
        return Err(AppError::config_error(format!(
            "Relevance window cannot exceed {MAX_RELEVANCE_WINDOW_DAYS} days"
        )));
    }

    for (name, url) in config.endpoints.iter() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::config_error(format!(
                "Endpoint '{name}' must start with http:// or https://, got '{url}'"
            )));
        }
    }

    for (platform, handle) in config.handles.iter() {
        if handle.trim().is_empty() || handle.chars().any(char::is_whitespace) {
            return Err(AppError::config_error(format!(
                "Handle for {platform} cannot be empty or contain whitespace: '{handle}'"
            )));
        }
    }

    for template in &config.recurring {
        if template.hour > 23 || template.minute > 59 {
            return Err(AppError::config_error(format!(
                "Recurring contest '{}' has invalid time {:02}:{:02}",
                template.name, template.hour, template.minute
            )));
        }
        if template.duration_minutes <= 0 {
            return Err(AppError::config_error(format!(
                "Recurring contest '{}' needs a positive duration",
                template.name
            )));
        }
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
