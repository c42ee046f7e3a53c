//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener until shutdown
//! - Bound the drain of in-flight requests after shutdown

use std::future::IntoFuture;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppSection;
use crate::http::handlers::{health, ping};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::state::AppState;

/// HTTP server for the exchange service.
pub struct HttpServer {
    router: Router,
    shutdown_timeout: Duration,
}

impl HttpServer {
    /// Create a new HTTP server around the bootstrapped state.
    pub fn new(state: AppState, app: &AppSection) -> Self {
        let routes = Router::new()
            .route("/ping", get(ping))
            .route("/health", get(health))
            .with_state(state);

        Self {
            router: with_middleware(routes, app.request_timeout()),
            shutdown_timeout: app.shutdown_timeout(),
        }
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// In-flight requests get `shutdown_timeout` to finish; after that the
    /// server returns regardless.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut drain = shutdown.resubscribe();
        let grace = self.shutdown_timeout;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .into_future();

        let deadline = async move {
            let _ = drain.recv().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = serve => result?,
            _ = deadline => {
                tracing::warn!(grace = ?grace, "Drain deadline passed, abandoning in-flight requests");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wrap routes with the standard middleware stack.
#[allow(deprecated)]
pub fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(TimeoutLayer::new(request_timeout))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
