//! People server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (request id, trace, timeout, body limit)
//!                         │
//!                         ▼
//!                    route table ◀── installed from Routable modules
//!                         │            (people, admin)
//!                         ▼
//!                 PeopleRoutes handler ──▶ PeopleStore (snapshot swap)
//!                         │
//!     Client Response     ▼
//!     ◀────────────── RouteResponse (JSON codec)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use people_server::config::{load_config, validate_config, ConfigError, ServerConfig};
use people_server::lifecycle::{build_application, signals, Shutdown};
use people_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "people-server")]
#[command(about = "In-memory people resource over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("people-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    let handle = if config.observability.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let app = build_application(config, handle)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    app.server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
