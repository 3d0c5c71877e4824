use super::Config;
use crate::error::AppError;
use std::net::SocketAddr;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Bind address must be a socket address (`host:port`)
/// - Provider URL must start with `http://` or `https://`
/// - Allowed origins cannot contain empty entries
/// - HTTP timeout must be at least one second
/// - If log file path is provided, it cannot be empty
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.bind_address.trim().is_empty() {
        return Err(AppError::config_error("Bind address cannot be empty"));
    }
    if config.bind_address.parse::<SocketAddr>().is_err() {
        return Err(AppError::config_error(format!(
            "Bind address '{}' must be in host:port form",
            config.bind_address
        )));
    }

    let url = config.provider_base_url.trim();
    if url.is_empty() {
        return Err(AppError::config_error("Provider URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::config_error(
            "Provider URL must start with http:// or https://",
        ));
    }

    if config.allowed_origins.iter().any(|o| o.trim().is_empty()) {
        return Err(AppError::config_error("Allowed origins cannot be empty"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    if let Some(log_path) = &config.log_file_path
        && log_path.is_empty()
    {
        return Err(AppError::config_error("Log file path cannot be empty"));
    }

    Ok(())
}
