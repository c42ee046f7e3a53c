//! Dependency bootstrap subsystem.
//!
//! # Data Flow
//! ```text
//! Startup sequence:
//!     → database.rs (open MySQL connection → ping → build pool with limits)
//!     → cache.rs (open Redis connection → PING)
//!
//! Each dependency:
//!     Connector::open → Connector::probe
//!         → ok:   Connector::configure → live handle returned
//!         → fail: resilience::retry waits the backoff and tries again
//!         → out of attempts: BootstrapError::Exhausted (last error kept)
//! ```
//!
//! # Design Decisions
//! - Handles are returned, never stored in globals
//! - A connection that opens but fails its probe costs one attempt, same as
//!   one that never opens
//! - Configuration (pool limits) happens only after a successful probe
//! - Nothing here exits the process; the binary decides

pub mod cache;
pub mod database;

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;

use crate::observability::metrics;
use crate::resilience::{retry, RetryPolicy};

pub use cache::{init_cache, RedisConnector};
pub use database::{init_database, MySqlConnector};

/// External dependency being bootstrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Database,
    Cache,
}

impl Dependency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::Database => "database",
            Dependency::Cache => "cache",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecoverable bootstrap failure.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to initialize {dependency} after {attempts} attempt(s), got error: {source}")]
    Exhausted {
        dependency: Dependency,
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BootstrapError {
    pub fn dependency(&self) -> Dependency {
        match self {
            BootstrapError::Exhausted { dependency, .. } => *dependency,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            BootstrapError::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// How to reach and verify one dependency.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Raw connection produced by `open`, verified by `probe`.
    type Connection: Send;
    /// Live handle published once the connection is verified.
    type Handle: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    fn dependency(&self) -> Dependency;

    /// Establish a connection.
    async fn open(&self) -> Result<Self::Connection, Self::Error>;

    /// Active liveness check on a freshly opened connection.
    async fn probe(&self, connection: &mut Self::Connection) -> Result<(), Self::Error>;

    /// Turn a verified connection into the long-lived handle.
    async fn configure(&self, connection: Self::Connection) -> Self::Handle;
}

/// Connect a dependency, retrying according to `policy`.
pub async fn bootstrap<C: Connector>(
    connector: &C,
    policy: &RetryPolicy,
) -> Result<C::Handle, BootstrapError> {
    let dependency = connector.dependency();
    let started = Instant::now();

    tracing::info!(
        %dependency,
        max_attempts = policy.max_attempts,
        "Connecting dependency"
    );

    let outcome = retry(policy, dependency.as_str(), |_attempt| async move {
        let mut connection = connector.open().await.inspect_err(|_| {
            metrics::record_attempt(dependency.as_str(), "open_failed");
        })?;

        connector.probe(&mut connection).await.inspect_err(|_| {
            metrics::record_attempt(dependency.as_str(), "probe_failed");
        })?;

        metrics::record_attempt(dependency.as_str(), "success");
        Ok::<_, C::Error>(connection)
    })
    .await;

    metrics::record_bootstrap_duration(dependency.as_str(), started);

    match outcome {
        Ok(connection) => {
            let handle = connector.configure(connection).await;
            metrics::record_dependency_up(dependency.as_str(), true);
            tracing::info!(
                %dependency,
                elapsed = ?started.elapsed(),
                "Dependency ready"
            );
            Ok(handle)
        }
        Err(exhausted) => {
            metrics::record_dependency_up(dependency.as_str(), false);
            Err(BootstrapError::Exhausted {
                dependency,
                attempts: exhausted.attempts,
                source: Box::new(exhausted.last_error),
            })
        }
    }
}
