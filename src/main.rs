//! `catalog-server`: serves a catalog database over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalogdb::{http, Catalog, Config};

#[derive(Parser, Debug)]
#[command(name = "catalog-server", about = "HTTP service for the record catalog", version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "CATALOG_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Path to the database file (created if missing)
    #[arg(long, env = "CATALOG_DB", default_value = "./catalog.db")]
    db: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "CATALOG_LOG", default_value = "info")]
    log_level: String,

    /// Keep everything in memory instead of opening `--db`
    #[arg(long)]
    in_memory: bool,

    /// Install the default validation rules when the store has none
    #[arg(long)]
    seed_default_rules: bool,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for ctrl-c; shutting down");
        return;
    }
    info!("ctrl-c received; shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = Config::default();
    let catalog = if cli.in_memory {
        Catalog::in_memory(config).context("creating in-memory catalog")?
    } else {
        Catalog::open(&cli.db, config)
            .with_context(|| format!("opening catalog at {}", cli.db.display()))?
    };

    if cli.seed_default_rules {
        let installed = catalog
            .seed_default_rules()
            .context("installing default validation rules")?;
        info!(installed, "Validation rules checked");
    }

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;

    let catalog = Arc::new(catalog);
    http::serve(listener, Arc::clone(&catalog), shutdown_signal())
        .await
        .context("serving HTTP")?;

    match Arc::try_unwrap(catalog) {
        Ok(catalog) => catalog.close().context("closing catalog")?,
        Err(_) => warn!("Catalog still shared at shutdown; relying on drop to flush"),
    }
    Ok(())
}
