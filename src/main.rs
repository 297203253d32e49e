//! Update server for Tauri v2 desktop clients.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /update/{target}-{arch}/{current_version}
//!   X-CUSTOMER / X-REGION / X-MACHINE-ID
//!        │
//!        ▼
//!   ┌─────────┐    ┌───────────────┐    ┌──────────────────────┐
//!   │  http   │───▶│ UpdateService │───▶│ release::select      │
//!   │ server  │    └───────┬───────┘    │  + rollout buckets   │
//!   └─────────┘            │            └──────────────────────┘
//!        ▲                 ▼
//!        │          ┌─────────────┐      ┌─────────────┐
//!   200 / 204 / 400 │ ConfigStore │◀─────│ watcher /   │
//!                   │ (ArcSwap)   │      │ SIGHUP      │
//!                   └─────────────┘      └─────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use update_server::config::validation::invalid_release_versions;
use update_server::config::{report_invalid_versions, ConfigStore, ConfigWatcher};
use update_server::http::UpdateServer;
use update_server::lifecycle::{signals, Shutdown};
use update_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "update-server")]
#[command(about = "Serves Tauri v2 update checks with staged rollouts", long_about = None)]
struct Args {
    /// Path to the YAML (or .toml) config file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override `server.port` from the config.
    #[arg(short, long)]
    port: Option<u16>,

    /// Load and validate the config, print a summary, and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // No previous snapshot exists yet, so a load failure here is fatal.
    let store = Arc::new(ConfigStore::open(&args.config)?);
    let snapshot = store.get();

    if args.check {
        println!("{}: OK", args.config.display());
        for release in &snapshot.releases {
            let platforms: Vec<&str> = release.platforms.keys().map(String::as_str).collect();
            let gated = if release.rollout.is_some() { "gated" } else { "open" };
            println!("  {} [{}] {}", release.version, gated, platforms.join(", "));
        }
        for invalid in invalid_release_versions(&snapshot) {
            println!("  warning: release #{} has invalid version {:?}: {}", invalid.index, invalid.version, invalid.reason);
        }
        return Ok(());
    }

    let settings = snapshot.server.clone();
    logging::init_logging(&settings.observability.log_level);

    tracing::info!("update-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %args.config.display(),
        releases = snapshot.releases.len(),
        request_timeout_secs = settings.request_timeout_secs,
        "Configuration loaded"
    );
    // The initial load ran before a subscriber existed, so warn again here.
    report_invalid_versions(&snapshot);

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
    metrics::record_release_count(snapshot.releases.len());
    drop(snapshot);

    // Without a watcher the server keeps serving; only hot reload is lost.
    let _watcher = if settings.watch {
        match ConfigWatcher::new(&args.config, store.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Could not watch config file, hot reload disabled");
                None
            }
        }
    } else {
        None
    };

    let shutdown = Shutdown::new();
    signals::spawn_shutdown_listener(shutdown.clone());
    signals::spawn_reload_on_hangup(store.clone(), &shutdown);

    let bind_address = settings.bind_address(args.port);
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = UpdateServer::new(store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
