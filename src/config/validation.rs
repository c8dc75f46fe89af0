use crate::config::types::{Config, FetchConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use encoding_rs::Encoding;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates the target site settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if config.domain.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site domain cannot be empty".to_string(),
        ));
    }

    for label in [&config.encoding, &config.fallback_encoding] {
        if Encoding::for_label(label.as_bytes()).is_none() {
            return Err(ConfigError::UnknownEncoding(label.clone()));
        }
    }

    Ok(())
}

/// Validates HTTP request behaviour
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.movies_path.is_empty() {
        return Err(ConfigError::Validation(
            "movies-path cannot be empty".to_string(),
        ));
    }

    if config.failed_path.is_empty() {
        return Err(ConfigError::Validation(
            "failed-path cannot be empty".to_string(),
        ));
    }

    if config.movies_path == config.failed_path {
        return Err(ConfigError::Validation(format!(
            "movies-path and failed-path must differ, both are '{}'",
            config.movies_path
        )));
    }

    Ok(())
}

/// Validates listing sources
fn validate_sources(sources: &[String]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one listing source is required".to_string(),
        ));
    }

    for source in sources {
        validate_http_url("source", source)?;
    }

    Ok(())
}

fn validate_http_url(what: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            what, value
        )));
    }

    Ok(())
}
