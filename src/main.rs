//! redirect404 server.
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!   request ──────▶│ request id → trace → timeout → identity      │
//!                  │        → not_found_guard → site / admin      │
//!                  │                                              │
//!   response ◀─────│ original response, or 303 → login page when  │
//!                  │ an anonymous caller would have seen a 404    │
//!                  └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirect404::config::{load_config, watcher::ConfigWatcher, GuardConfig};
use redirect404::http::HttpServer;
use redirect404::lifecycle::{signals, Shutdown};
use redirect404::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "redirect404")]
#[command(about = "Serve the site with anonymous 404s turned into login challenges", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("redirect404 v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        security_enforced = config.security.enabled,
        login_path = %config.security.login_path,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the whole run.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::trigger_on_signal(&shutdown).await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
