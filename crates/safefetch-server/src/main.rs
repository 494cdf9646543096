use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use safefetch_core::config;
use safefetch_core::logging;
use safefetch_core::pipeline::FetchPipeline;
use safefetch_core::policy::FetchPolicy;

mod api;

/// Guarded URL-fetch service.
#[derive(Debug, Parser)]
#[command(name = "safefetchd")]
#[command(about = "safefetch: guarded URL-fetch service", long_about = None)]
struct Args {
    /// Path to the TOML config file (default: XDG config dir, created with
    /// defaults on first run).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080", value_name = "ADDR")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr when
    // the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = run(Args::parse()).await {
        tracing::error!("fatal: {:#}", err);
        eprintln!("safefetchd error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = match args.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let cfg = config::load_or_init(&config_path)?;
    tracing::debug!("loaded config: {:?}", cfg);

    let policy = FetchPolicy::from_config(&cfg).context("invalid fetch policy")?;
    let pipeline = Arc::new(FetchPipeline::new(Arc::new(policy)));

    let app = api::router(pipeline);
    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    tracing::info!("listening on {}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
