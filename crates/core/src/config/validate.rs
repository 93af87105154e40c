use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - TMDB API key is present (non-empty)
/// - Batch size is not 0
/// - Thresholds are within 0-100 and ordered (relaxed <= match)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key is required".to_string(),
        ));
    }

    if config.enricher.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "enricher.batch_size cannot be 0".to_string(),
        ));
    }

    if config.enricher.match_threshold > 100 || config.enricher.relaxed_threshold > 100 {
        return Err(ConfigError::ValidationError(
            "enricher thresholds must be within 0-100".to_string(),
        ));
    }

    if config.enricher.relaxed_threshold > config.enricher.match_threshold {
        return Err(ConfigError::ValidationError(
            "enricher.relaxed_threshold cannot exceed enricher.match_threshold".to_string(),
        ));
    }

    Ok(())
}
