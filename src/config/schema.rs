//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the exchange service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub app: AppSection,

    /// Relational store connection settings.
    pub database: DatabaseConfig,

    /// Cache store connection settings.
    pub cache: CacheConfig,

    /// Retry policies applied while connecting dependencies at startup.
    pub bootstrap: BootstrapConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application / listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSection {
    /// Service name used in logs.
    pub name: String,

    /// Listen port, in any of the forms `":8080"`, `"8080"` or `"0.0.0.0:8080"`.
    /// Empty means `":8080"`.
    pub port: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_timeout_secs: u64,
}

pub const DEFAULT_PORT: &str = ":8080";

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "exchangeapp".to_string(),
            port: DEFAULT_PORT.to_string(),
            request_timeout_secs: 30,
            shutdown_timeout_secs: 10,
        }
    }
}

impl AppSection {
    /// Resolve the configured port into a bindable `host:port` address.
    ///
    /// A leading colon (Go style) binds every interface.
    pub fn bind_address(&self) -> String {
        let port = self.port.trim();
        let port = if port.is_empty() { DEFAULT_PORT } else { port };

        if let Some(bare) = port.strip_prefix(':') {
            format!("0.0.0.0:{}", bare)
        } else if port.chars().all(|c| c.is_ascii_digit()) {
            format!("0.0.0.0:{}", port)
        } else {
            port.to_string()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `mysql://user:pass@db:3306/exchangeapp`.
    pub dsn: String,

    /// Connections kept warm in the pool.
    #[serde(alias = "maxIdleConns")]
    pub max_idle_conns: u32,

    /// Upper bound on open connections.
    #[serde(alias = "maxOpenConns")]
    pub max_open_conns: u32,

    /// Maximum lifetime of a pooled connection in seconds.
    pub conn_max_lifetime_secs: u64,

    /// Timeout for a single connection attempt in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            max_idle_conns: 10,
            max_open_conns: 100,
            conn_max_lifetime_secs: 3600,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Builder-style constructor for a DSN with default pool limits.
    pub fn with_dsn(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Default::default()
        }
    }

    pub fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Cache store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `host:port` of the Redis server.
    pub address: String,

    /// Optional password; empty means no authentication.
    pub password: String,

    /// Logical database index.
    pub db: i64,

    /// Timeout in seconds for connecting, and separately for the liveness probe.
    pub connect_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            address: "redis:6379".to_string(),
            password: String::new(),
            db: 0,
            connect_timeout_secs: 5,
        }
    }
}

impl CacheConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Retry policies for each startup dependency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub database: RetryConfig,
    pub cache: RetryConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            database: RetryConfig::default(),
            // A single probe: an unreachable cache fails startup immediately.
            cache: RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
        }
    }
}

/// Backoff strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay before every retry.
    #[default]
    Constant,
    /// Doubling delay with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Retry configuration for a single dependency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,

    /// Backoff strategy.
    pub backoff: BackoffKind,

    /// Constant delay, or base delay for exponential backoff, in milliseconds.
    pub delay_ms: u64,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            backoff: BackoffKind::Constant,
            delay_ms: 3000,
            max_delay_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
