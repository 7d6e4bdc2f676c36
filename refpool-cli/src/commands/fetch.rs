//! `refpool fetch-referrals`

use super::{parse_timestamp, write_json};
use crate::config::{ConfigLoader, ConfigOverrides};
use clap::Args;
use refpool_core::processors::{HyperSyncLogSource, RpcBlockResolver};
use refpool_core::referrals::ReferralEventPipeline;
use refpool_sdk::objects::Protocol;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use url::Url;

#[derive(Args, Debug)]
pub struct FetchReferralsArgs {
    /// Protocols to fetch, comma separated (e.g. celo-transactions,lisk-v0)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub protocol: Vec<Protocol>,

    /// First block to scan; overrides --include-all
    #[arg(long)]
    pub start_block: Option<u64>,

    /// Scan from the protocol's genesis block instead of the recent lookback
    #[arg(long, default_value = "false")]
    pub include_all: bool,

    /// Events at or after this instant are not included (RFC 3339)
    #[arg(short, long, value_parser = parse_timestamp)]
    pub end_timestamp: OffsetDateTime,

    /// Override the indexer URL from the config file
    #[arg(long)]
    pub indexer_url: Option<Url>,

    #[arg(long, env = "HYPERSYNC_API_TOKEN", hide_env_values = true)]
    pub hypersync_api_token: Option<String>,

    /// Directory the per-protocol referral files are written to
    #[arg(short, long, default_value = "referrals")]
    pub output_dir: PathBuf,
}

pub fn output_path(output_dir: &Path, protocol: Protocol) -> PathBuf {
    output_dir.join(format!("{}-referrals.json", protocol))
}

pub async fn run(config_path: &Path, args: FetchReferralsArgs) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(
        config_path,
        ConfigOverrides {
            indexer_url: args.indexer_url,
            api_token: args.hypersync_api_token,
        },
    );
    let config = loader.load()?;
    tracing::info!(indexer = %config.indexer.url, "Configuration loaded from {:?}", config_path);

    let pipeline = ReferralEventPipeline::new(
        HyperSyncLogSource::new(&config.indexer),
        RpcBlockResolver::new(config.rpc),
        config.referrals,
        config.indexer.retry,
    );

    let results = pipeline
        .fetch_referral_events_for_protocols(
            &args.protocol,
            args.start_block,
            args.include_all,
            args.end_timestamp,
        )
        .await?;

    for (protocol, events) in results {
        tracing::info!(%protocol, events = events.len(), "Unique referral events");
        write_json(&output_path(&args.output_dir, protocol), &events)?;
    }

    Ok(())
}
