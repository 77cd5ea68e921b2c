//! Medibot Daemon - medical question answering bridge
//!
//! Forwards questions to a local model, scores answers with an evaluation
//! model, and keeps a history of every exchange.

use anyhow::Result;
use clap::Parser;
use medibotd::config::Config;
use medibotd::server;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "medibotd", version, about = "Medical chatbot bridge daemon")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Medibot Daemon v{} starting", medibot_common::VERSION);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    server::run(config).await
}
