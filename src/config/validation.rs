use crate::config::types::{AnalyzerConfig, Config, HttpConfig, StorageConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_analyzer_config(&config.analyzer)?;
    validate_http_config(&config.http)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates job and probe limits
fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_jobs < 1 || config.max_concurrent_jobs > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_jobs must be between 1 and 64, got {}",
            config.max_concurrent_jobs
        )));
    }

    if config.job_queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "job_queue_capacity must be >= 1, got {}",
            config.job_queue_capacity
        )));
    }

    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_probes must be between 1 and 1000, got {}",
            config.max_concurrent_probes
        )));
    }

    if config.probe_channel_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_channel_capacity must be >= 1, got {}",
            config.probe_channel_capacity
        )));
    }

    Ok(())
}

/// Validates HTTP client overrides
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be empty when set".to_string(),
            ));
        }

        if user_agent.chars().any(|c| c.is_control()) {
            return Err(ConfigError::Validation(format!(
                "user_agent contains control characters: {:?}",
                user_agent
            )));
        }
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
