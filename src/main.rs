//! Exchange-rate service (v0.1)
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config ──▶ lifecycle::startup
//!                                   │
//!                 ┌─────────────────┼──────────────────┐
//!                 ▼                 ▼                  ▼
//!          bootstrap::database  bootstrap::cache   migrations
//!          (retry + ping)       (PING)             (3 tables)
//!                 │                 │
//!                 └──────▶ AppState ◀┘
//!                             │
//!                             ▼
//!                      http::server ──▶ /ping, /health
//! ```
//!
//! Startup failures are logged and turn into exit status 1; nothing serves
//! until both dependencies are connected.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use exchangeapp::config::load_config;
use exchangeapp::lifecycle::{signals, Application, Shutdown, StartupError};
use exchangeapp::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "exchangeapp")]
#[command(about = "Exchange-rate service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "EXCHANGEAPP_CONFIG", default_value = "config/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        config = %args.config.display(),
        bind_address = %config.app.bind_address(),
        database_attempts = config.bootstrap.database.max_attempts,
        cache_address = %config.cache.address,
        cache_attempts = config.bootstrap.cache.max_attempts,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation has already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let app = Application::build(config).await?;
    let local_addr = app.local_addr().map_err(StartupError::Serve)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(&shutdown);

    app.run(server_shutdown).await
}
