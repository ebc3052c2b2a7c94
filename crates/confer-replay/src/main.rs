//! Confer replay binary.
//!
//! # Usage
//!
//! ```bash
//! confer-replay --script session.jsonl
//! confer-replay --config confer.toml --script session.jsonl --log-level debug
//! ```

use std::path::PathBuf;

use clap::Parser;
use confer_core::SessionConfig;
use confer_replay::{load_script, replay};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Replay scripted transport traffic through a Confer session
#[derive(Parser, Debug)]
#[command(name = "confer-replay")]
#[command(about = "Replay scripted transport traffic through a Confer session")]
#[command(version)]
struct Args {
    /// Session configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script to replay (JSON Lines)
    #[arg(short, long)]
    script: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let ops = load_script(&args.script)?;
    tracing::info!(ops = ops.len(), script = %args.script.display(), "replaying");

    let summary = replay(config, ops).await?;

    tracing::info!(state = %summary.state, commands = summary.commands, events = summary.events, "replay finished");
    for line in summary.to_string().lines() {
        tracing::info!("{line}");
    }

    Ok(())
}
