//! MySQL bootstrap.
//!
//! # Responsibilities
//! - Open a single connection from the DSN and ping it
//! - After a successful ping, build the shared pool with the configured limits
//!
//! sqlx has no cap on idle connections; `max_idle_conns` becomes the pool's
//! floor of warm connections (`min_connections`), clamped to `max_open_conns`.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection};

use crate::bootstrap::{bootstrap, BootstrapError, Connector, Dependency};
use crate::config::{DatabaseConfig, RetryConfig};
use crate::resilience::RetryPolicy;

/// Connects to MySQL using a [`DatabaseConfig`].
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    config: DatabaseConfig,
}

/// A connection that has been opened but not yet handed to the pool.
pub struct ProbeConnection {
    options: MySqlConnectOptions,
    connection: MySqlConnection,
}

impl MySqlConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Pool options derived from the configured limits.
    pub fn pool_options(&self) -> MySqlPoolOptions {
        let max_open = self.config.max_open_conns.max(1);

        MySqlPoolOptions::new()
            .max_connections(max_open)
            .min_connections(self.config.max_idle_conns.min(max_open))
            .max_lifetime(self.config.conn_max_lifetime())
            .acquire_timeout(self.config.connect_timeout())
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = ProbeConnection;
    type Handle = MySqlPool;
    type Error = sqlx::Error;

    fn dependency(&self) -> Dependency {
        Dependency::Database
    }

    async fn open(&self) -> Result<ProbeConnection, sqlx::Error> {
        let options = MySqlConnectOptions::from_str(&self.config.dsn)?;

        let connection =
            match tokio::time::timeout(self.config.connect_timeout(), options.connect()).await {
                Ok(connection) => connection?,
                Err(_) => {
                    return Err(sqlx::Error::Io(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "timed out connecting to database",
                    )))
                }
            };

        Ok(ProbeConnection {
            options,
            connection,
        })
    }

    async fn probe(&self, probe: &mut ProbeConnection) -> Result<(), sqlx::Error> {
        probe.connection.ping().await
    }

    async fn configure(&self, probe: ProbeConnection) -> MySqlPool {
        let ProbeConnection {
            options,
            connection,
        } = probe;

        if let Err(e) = connection.close().await {
            tracing::debug!(error = %e, "Closing probe connection failed");
        }

        tracing::info!(
            max_open_conns = self.config.max_open_conns,
            max_idle_conns = self.config.max_idle_conns,
            conn_max_lifetime_secs = self.config.conn_max_lifetime_secs,
            "Database pool configured"
        );

        self.pool_options().connect_lazy_with(options)
    }
}

/// Connect the relational store, retrying per `retry`.
pub async fn init_database(
    config: &DatabaseConfig,
    retry: &RetryConfig,
) -> Result<MySqlPool, BootstrapError> {
    let connector = MySqlConnector::new(config.clone());
    bootstrap(&connector, &RetryPolicy::from(retry)).await
}
