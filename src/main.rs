//! Wimbledon finals API server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id / trace / timeout / CORS
//!                 │
//!                 ├── GET /health ─────────────────────────────▶ 200
//!                 │
//!                 └── GET /wimbledon, /wimbledon/player/{name}
//!                        │
//!                        ▼
//!                   auth gate (X-API-Key | api_key | Basic)
//!                        │
//!                        ▼
//!                   input validation ──▶ dataset store ──▶ lookup ──▶ JSON
//!                                          │
//!                                          └─ missing CSV: run producer (bounded)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use wimbledon_api::config::{load_config, loader::set_port};
use wimbledon_api::lifecycle::Shutdown;
use wimbledon_api::observability::{logging, metrics};
use wimbledon_api::HttpServer;

#[derive(Parser)]
#[command(name = "wimbledon-api")]
#[command(about = "HTTP API serving Wimbledon gentlemen's singles finals", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus environment when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overrides the config file and PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        set_port(&mut config, port);
    }

    logging::init_logging(&config.observability);
    tracing::info!("wimbledon-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        dataset = %config.dataset.path.display(),
        auth_enabled = config.auth.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let mut server = HttpServer::new(config.clone());
    if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(state) => server = server.with_metrics(state),
            Err(e) => tracing::error!(error = %e, "Metrics disabled"),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
