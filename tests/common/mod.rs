//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use exchangeapp::bootstrap::{Connector, Dependency};

/// Error produced by [`FakeConnector`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// How a [`FakeConnector`] fails before it becomes reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Failure {
    /// `open` fails.
    Open,
    /// `open` succeeds, `probe` fails.
    Probe,
}

#[derive(Debug)]
pub struct FakeConnection {
    pub attempt: u32,
}

#[derive(Debug)]
pub struct FakeHandle {
    pub attempt: u32,
}

/// A dependency that becomes reachable on a chosen attempt (or never).
pub struct FakeConnector {
    dependency: Dependency,
    ready_on: Option<u32>,
    failure: Failure,
    opens: AtomicU32,
    probes: AtomicU32,
    configured: AtomicU32,
}

#[allow(dead_code)]
impl FakeConnector {
    pub fn new(dependency: Dependency, ready_on: Option<u32>, failure: Failure) -> Self {
        Self {
            dependency,
            ready_on,
            failure,
            opens: AtomicU32::new(0),
            probes: AtomicU32::new(0),
            configured: AtomicU32::new(0),
        }
    }

    pub fn database_ready_on(attempt: u32) -> Self {
        Self::new(Dependency::Database, Some(attempt), Failure::Open)
    }

    pub fn unreachable(dependency: Dependency) -> Self {
        Self::new(dependency, None, Failure::Open)
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn configured(&self) -> u32 {
        self.configured.load(Ordering::SeqCst)
    }

    fn reachable(&self, attempt: u32) -> bool {
        self.ready_on.is_some_and(|ready| attempt >= ready)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Connection = FakeConnection;
    type Handle = FakeHandle;
    type Error = FakeError;

    fn dependency(&self) -> Dependency {
        self.dependency
    }

    async fn open(&self) -> Result<FakeConnection, FakeError> {
        let attempt = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failure == Failure::Open && !self.reachable(attempt) {
            return Err(FakeError(format!("connection refused (attempt {attempt})")));
        }
        Ok(FakeConnection { attempt })
    }

    async fn probe(&self, connection: &mut FakeConnection) -> Result<(), FakeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.failure == Failure::Probe && !self.reachable(connection.attempt) {
            return Err(FakeError(format!(
                "ping failed (attempt {})",
                connection.attempt
            )));
        }
        Ok(())
    }

    async fn configure(&self, connection: FakeConnection) -> FakeHandle {
        self.configured.fetch_add(1, Ordering::SeqCst);
        FakeHandle {
            attempt: connection.attempt,
        }
    }
}
