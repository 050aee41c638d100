//! GitHub resource proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!     Client Request       │  ┌────────┐   ┌───────────┐   ┌───────────┐  │
//!     ─────────────────────┼─▶│ server │──▶│ routing   │──▶│ security  │  │
//!     /https://github...   │  │ (axum) │   │ normalize │   │ allow/deny│  │
//!                          │  └────────┘   │ classify  │   │ /bypass   │  │
//!                          │               └─────┬─────┘   └─────┬─────┘  │
//!                          │                     ▼               │        │
//!     302 / 403 / static   │              ┌────────────┐         │        │
//!     ◀────────────────────┼──────────────│  response  │◀────────┘        │
//!                          │              └────────────┘                  │
//!     Streamed body        │  ┌─────────┐   ┌───────────┐                 │
//!     ◀────────────────────┼──│  body   │◀──│  forward  │◀──────────────── Upstream
//!                          │  │ chunks  │   │ (reqwest) │                 │
//!                          │  └─────────┘   └───────────┘                 │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gh_proxy::config::load_config;
use gh_proxy::http::HttpServer;
use gh_proxy::lifecycle::{signals, Shutdown};
use gh_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "gh-proxy")]
#[command(about = "Streaming proxy for GitHub releases, files and gists", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GH_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen host, overriding file and environment.
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding file and environment.
    #[arg(short, long)]
    port: Option<u16>,

    /// Validate the configuration, print the effective settings and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gh-proxy: {e}");
            std::process::exit(1);
        }
    };

    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    if cli.check {
        print!("{}", toml::to_string(&config)?);
        return Ok(());
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("gh-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(&config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
