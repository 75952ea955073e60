use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Service URLs, API key and callback name are non-empty
/// - Callback name is a plain identifier
/// - Page size and timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let metadata = &config.metadata;

    if metadata.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "metadata.base_url cannot be empty".to_string(),
        ));
    }
    if metadata.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "metadata.api_key cannot be empty".to_string(),
        ));
    }
    if metadata.callback.is_empty()
        || !metadata
            .callback
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(ConfigError::ValidationError(format!(
            "metadata.callback must be an identifier, got {:?}",
            metadata.callback
        )));
    }
    if metadata.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "metadata.page_size cannot be 0".to_string(),
        ));
    }
    if config.images.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "images.base_url cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("metadata.timeout_secs", metadata.timeout_secs),
        ("images.timeout_secs", config.images.timeout_secs),
        ("finding_aid.timeout_secs", config.finding_aid.timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be 0",
                name
            )));
        }
    }

    Ok(())
}
