use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one fetch URL is configured
/// - Postprocess event cap is not zero
/// - The run-name prefix is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.fetch.urls.is_empty() {
        return Err(ConfigError::ValidationError(
            "fetch.urls cannot be empty".to_string(),
        ));
    }

    if config.postprocess.events_per_file == 0 {
        return Err(ConfigError::ValidationError(
            "postprocess.events_per_file cannot be 0".to_string(),
        ));
    }

    if config.pipeline.prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}
