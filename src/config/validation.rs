//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, pool sizes > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, RetryConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("database.dsn must not be empty")]
    EmptyDsn,

    #[error("database.max_open_conns must be at least 1")]
    ZeroMaxOpen,

    #[error("app.port {0:?} is not a valid listen address")]
    InvalidPort(String),

    #[error("cache.address {0:?} must be host:port")]
    InvalidCacheAddress(String),

    #[error("cache.db must not be negative (got {0})")]
    NegativeCacheDb(i64),

    #[error("{0}.connect_timeout_secs must be at least 1")]
    ZeroConnectTimeout(&'static str),

    #[error("bootstrap.{0}.max_attempts must be at least 1")]
    ZeroAttempts(&'static str),

    #[error("bootstrap.{0}.max_delay_ms must not be below delay_ms")]
    InvertedDelays(&'static str),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.dsn.trim().is_empty() {
        errors.push(ValidationError::EmptyDsn);
    }
    if config.database.max_open_conns == 0 {
        errors.push(ValidationError::ZeroMaxOpen);
    }
    if config.database.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout("database"));
    }

    let bind = config.app.bind_address();
    if !has_port(&bind) {
        errors.push(ValidationError::InvalidPort(config.app.port.clone()));
    }

    if !has_port(&config.cache.address) {
        errors.push(ValidationError::InvalidCacheAddress(
            config.cache.address.clone(),
        ));
    }
    if config.cache.db < 0 {
        errors.push(ValidationError::NegativeCacheDb(config.cache.db));
    }
    if config.cache.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout("cache"));
    }

    check_retry("database", &config.bootstrap.database, &mut errors);
    check_retry("cache", &config.bootstrap.cache, &mut errors);

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_retry(target: &'static str, retry: &RetryConfig, errors: &mut Vec<ValidationError>) {
    if retry.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts(target));
    }
    if retry.max_delay_ms < retry.delay_ms {
        errors.push(ValidationError::InvertedDelays(target));
    }
}

/// `host:port` with a non-empty host and a numeric port.
fn has_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DatabaseConfig;

    fn valid() -> AppConfig {
        AppConfig {
            database: DatabaseConfig::with_dsn("mysql://root:root@db:3306/exchangeapp"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = valid();
        config.database.dsn = String::new();
        config.database.max_open_conns = 0;
        config.cache.address = "redis".to_string();
        config.bootstrap.cache.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyDsn,
                ValidationError::ZeroMaxOpen,
                ValidationError::InvalidCacheAddress("redis".to_string()),
                ValidationError::ZeroAttempts("cache"),
            ]
        );
    }

    #[test]
    fn test_rejects_garbage_port() {
        let mut config = valid();
        config.app.port = ":http".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidPort(":http".to_string())]);
    }

    #[test]
    fn test_rejects_zero_connect_timeouts() {
        let mut config = valid();
        config.database.connect_timeout_secs = 0;
        config.cache.connect_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroConnectTimeout("database"),
                ValidationError::ZeroConnectTimeout("cache"),
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
