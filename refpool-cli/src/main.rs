//! refpool
//!
//! Fetches referral registrations from the on-chain registry and splits a
//! campaign reward pool among referrers by KPI.

mod commands;
mod config;
mod shutdown;

use clap::{Parser, Subcommand};
use commands::allocate::AllocateArgs;
use commands::fetch::FetchReferralsArgs;
use shutdown::shutdown_signal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// refpool - referral event ingestion and reward allocation
#[derive(Parser, Debug)]
#[command(name = "refpool")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "./refpool.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch deduplicated referral events per protocol
    FetchReferrals(FetchReferralsArgs),
    /// Allocate a reward pool from KPI data
    Allocate(AllocateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting refpool v{}", env!("CARGO_PKG_VERSION"));

    tokio::select! {
        result = run(args) => result.map_err(|e| {
            tracing::error!("{:#}", e);
            e
        }),
        signal = shutdown_signal() => {
            signal?;
            anyhow::bail!("interrupted before completion")
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::FetchReferrals(fetch) => commands::fetch::run(&args.config, fetch).await,
        Command::Allocate(allocate) => commands::allocate::run(allocate),
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
