use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use articles_api::config::{resolve_config, EnvOverrides};
use articles_api::lifecycle::{shutdown_signal, start, start_with_store};
use articles_api::observability::{logging, metrics};
use articles_api::MemoryStore;

#[derive(Parser)]
#[command(name = "articles-api")]
#[command(about = "CRUD HTTP API for blog articles", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep articles in process memory instead of MongoDB.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref(), &EnvOverrides::from_env())?;

    logging::init_logging(&config.observability);
    tracing::info!("articles-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address(),
        database = %config.database.name,
        in_memory = args.in_memory,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let handle = if args.in_memory {
        start_with_store(&config, Arc::new(MemoryStore::new())).await?
    } else {
        start(&config).await?
    };

    shutdown_signal().await;
    handle.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
