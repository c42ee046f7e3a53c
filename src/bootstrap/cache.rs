//! Redis bootstrap.
//!
//! The handle is a [`ConnectionManager`], which reconnects on its own after
//! the server restarts. Its initial connect is limited to one try so the
//! bootstrap policy alone decides how often startup retries.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{ErrorKind, RedisError, RedisResult};
use url::Url;

use crate::bootstrap::{bootstrap, BootstrapError, Connector, Dependency};
use crate::config::{CacheConfig, RetryConfig};
use crate::resilience::RetryPolicy;

/// Connects to Redis using a [`CacheConfig`].
#[derive(Debug, Clone)]
pub struct RedisConnector {
    config: CacheConfig,
}

impl RedisConnector {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// `redis://[:password@]address/db` for the configured endpoint.
    pub fn connection_url(&self) -> Result<Url, RedisError> {
        let invalid = |detail: String| {
            RedisError::from((ErrorKind::InvalidClientConfig, "invalid cache address", detail))
        };

        let mut url = Url::parse(&format!("redis://{}/{}", self.config.address, self.config.db))
            .map_err(|e| invalid(e.to_string()))?;

        if !self.config.password.is_empty() {
            url.set_password(Some(&self.config.password))
                .map_err(|()| invalid(self.config.address.clone()))?;
        }

        Ok(url)
    }
}

/// Fail with a timed-out I/O error if `operation` outlives `limit`.
async fn within<T>(
    limit: Duration,
    stage: &str,
    operation: impl Future<Output = RedisResult<T>>,
) -> RedisResult<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(RedisError::from(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("timed out {stage} cache after {limit:?}"),
        ))),
    }
}

#[async_trait]
impl Connector for RedisConnector {
    type Connection = ConnectionManager;
    type Handle = ConnectionManager;
    type Error = RedisError;

    fn dependency(&self) -> Dependency {
        Dependency::Cache
    }

    async fn open(&self) -> Result<ConnectionManager, RedisError> {
        let client = redis::Client::open(self.connection_url()?.as_str())?;
        let manager_config = ConnectionManagerConfig::new().set_number_of_retries(0);

        within(
            self.config.connect_timeout(),
            "connecting to",
            ConnectionManager::new_with_config(client, manager_config),
        )
        .await
    }

    async fn probe(&self, connection: &mut ConnectionManager) -> Result<(), RedisError> {
        let _: String = within(
            self.config.connect_timeout(),
            "pinging",
            redis::cmd("PING").query_async(connection),
        )
        .await?;
        Ok(())
    }

    async fn configure(&self, connection: ConnectionManager) -> ConnectionManager {
        tracing::info!(address = %self.config.address, db = self.config.db, "Cache client ready");
        connection
    }
}

/// Connect the cache store, retrying per `retry`.
pub async fn init_cache(
    config: &CacheConfig,
    retry: &RetryConfig,
) -> Result<ConnectionManager, BootstrapError> {
    let connector = RedisConnector::new(config.clone());
    bootstrap(&connector, &RetryPolicy::from(retry)).await
}
