//! Subdomain rewrite proxy.
//!
//! ```text
//!   Client ──▶ listener ──▶ rewrite filter ──▶ upstream handler ──▶ Backend
//!                              │   ▲
//!                   404 + fallback │
//!                              ▼   │
//!                         fallback forward (second request, at most once)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use subdomain_rewrite::config::{load_config, ProxyConfig};
use subdomain_rewrite::http::HttpServer;
use subdomain_rewrite::lifecycle::{signals::shutdown_signal, Shutdown};
use subdomain_rewrite::observability::{logging::init_logging, metrics};

#[derive(Parser)]
#[command(name = "subdomain-rewrite")]
#[command(about = "Rewrites requests by subdomain and retries 404s against a fallback path", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    init_logging(config.observability.log_level);

    tracing::info!("subdomain-rewrite v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
