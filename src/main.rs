//! Edge adapter (local invoke server).
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                     EDGE ADAPTER                     │
//!                      │                                                      │
//!   Edge event (JSON)  │  ┌────────┐    ┌─────────┐  match   ┌─────────────┐  │
//!  ────────────────────┼─▶│ /invoke│───▶│ routing │─────────▶│ pass-through│──┼──▶ origin request
//!                      │  └────────┘    └────┬────┘          │ (+ rewrite) │  │
//!                      │                     │ no match      └─────────────┘  │
//!                      │                     ▼                                │
//!                      │               ┌──────────┐    ┌──────────┐           │
//!                      │               │  codec   │───▶│ upstream │───────────┼──▶ Application
//!                      │               │ request  │    │ handler  │◀──────────┼───
//!                      │               └──────────┘    └────┬─────┘           │
//!                      │                                    ▼                 │
//!   Edge result (JSON) │               ┌──────────┐   failure → 500           │
//!  ◀───────────────────┼───────────────│  codec   │◀──────────┘               │
//!                      │               │ response │                           │
//!                      │               └──────────┘                           │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_adapter::config::{self, AdapterConfig, ConfigWatcher};
use edge_adapter::observability::{logging, metrics};
use edge_adapter::{HttpServer, OriginRouter, Shutdown};

#[derive(Parser)]
#[command(name = "edge-adapter")]
#[command(about = "Edge request adapter with a local invoke server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the invoke server (default)
    Serve,
    /// Validate the configuration and print the origin paths
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.config).await,
        Commands::Check => check(&config),
    }
}

fn load(path: Option<&Path>) -> Result<AdapterConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::loader::default_config(),
    }
}

async fn serve(
    config: AdapterConfig,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);
    tracing::info!("edge-adapter v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        app_url = %config.server.app_url,
        mode = %config.mode,
        request_timeout_secs = config.server.request_timeout_secs,
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

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for edge events");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &AdapterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rules = config
        .origin_paths
        .iter()
        .map(edge_adapter::OriginPathRule::from_config)
        .collect::<Result<Vec<_>, _>>()?;
    let router = OriginRouter::new(rules)?;

    println!("mode: {}", config.mode);
    println!("default host: {}", config.default_host);
    println!("application: {}", config.server.app_url);
    println!("origin paths ({}):", router.paths().len());
    for (i, path) in router.paths().iter().enumerate() {
        let rewrite = config.origin_paths[i].rewrite.as_deref().unwrap_or("-");
        println!("  {:>2}. {}  rewrite: {}", i + 1, path.pattern(), rewrite);
    }
    println!("configuration OK");
    Ok(())
}
