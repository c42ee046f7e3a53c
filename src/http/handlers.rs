//! Liveness and readiness handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

#[derive(Debug, Serialize)]
pub struct DependencyHealth {
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyHealth {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self { up: true, error: None },
            Err(e) => Self {
                up: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub database: DependencyHealth,
    pub cache: DependencyHealth,
}

impl HealthResponse {
    fn new(uptime_seconds: u64, database: DependencyHealth, cache: DependencyHealth) -> Self {
        let healthy = database.up && cache.up;
        Self {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds,
            database,
            cache,
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.database.up && self.cache.up {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health - probes both dependencies.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = sqlx::query("SELECT 1")
        .execute(state.db())
        .await
        .map(|_| ());

    let mut connection = state.cache();
    let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut connection).await;
    let cache = pong.map(|_| ());

    if let Err(e) = &database {
        tracing::warn!(error = %e, "Database health probe failed");
    }
    if let Err(e) = &cache {
        tracing::warn!(error = %e, "Cache health probe failed");
    }

    let response = HealthResponse::new(
        state.uptime_secs(),
        DependencyHealth::from_result(database),
        DependencyHealth::from_result(cache),
    );
    (response.status_code(), Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_says_pong() {
        let Json(body) = ping().await;
        assert_eq!(body, json!({ "message": "pong" }));
    }

    #[test]
    fn test_degraded_when_a_dependency_is_down() {
        let response = HealthResponse::new(
            5,
            DependencyHealth::from_result::<&str>(Ok(())),
            DependencyHealth::from_result(Err("connection refused")),
        );

        assert_eq!(response.status, "degraded");
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["database"], json!({ "up": true }));
        assert_eq!(
            body["cache"],
            json!({ "up": false, "error": "connection refused" })
        );
    }

    #[test]
    fn test_ok_when_everything_is_up() {
        let response = HealthResponse::new(
            0,
            DependencyHealth::from_result::<&str>(Ok(())),
            DependencyHealth::from_result::<&str>(Ok(())),
        );
        assert_eq!(response.status, "ok");
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
