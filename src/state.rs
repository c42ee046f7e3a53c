//! Application state shared across handlers.
//!
//! Built once from the handles returned by the bootstrap sequence, so no
//! handler can run before both dependencies are connected.

use std::sync::Arc;
use std::time::Instant;

use redis::aio::ConnectionManager;
use sqlx::MySqlPool;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    db: MySqlPool,
    cache: ConnectionManager,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, db: MySqlPool, cache: ConnectionManager) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                cache,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn db(&self) -> &MySqlPool {
        &self.inner.db
    }

    /// A cache handle; clones share one managed connection that reconnects after failures.
    pub fn cache(&self) -> ConnectionManager {
        self.inner.cache.clone()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}
