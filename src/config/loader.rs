//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackoffKind;
    use std::io::Write;

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [app]
            port = ":3000"

            [database]
            dsn = "mysql://root:root@db:3306/exchangeapp"
            max_idle_conns = 5
            max_open_conns = 20

            [cache]
            address = "cache.internal:6380"
            db = 2

            [bootstrap.cache]
            max_attempts = 5
            backoff = "exponential"
            delay_ms = 200
            max_delay_ms = 2000
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.app.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database.max_idle_conns, 5);
        assert_eq!(config.cache.address, "cache.internal:6380");
        assert_eq!(config.cache.db, 2);
        assert_eq!(config.bootstrap.cache.max_attempts, 5);
        assert_eq!(config.bootstrap.cache.backoff, BackoffKind::Exponential);
        // Untouched sections keep their defaults.
        assert_eq!(config.bootstrap.database.max_attempts, 20);
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/config.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.bootstrap.database.max_attempts, 20);
        assert_eq!(config.bootstrap.cache.max_attempts, 1);
        assert_eq!(config.cache.address, "redis:6379");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = parse_config("[database\ndsn = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_config("[app]\nport = \":8080\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: database.dsn must not be empty"
        );
    }
}
