//! Exchange-rate service library.
//!
//! Startup wiring for the exchange service: configuration, resilient
//! database and cache bootstrap, schema migration and the HTTP listener.

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod migrations;
pub mod observability;
pub mod resilience;
pub mod state;

pub use config::AppConfig;
pub use lifecycle::{Application, Shutdown, StartupError};
pub use state::AppState;
