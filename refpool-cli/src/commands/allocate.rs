//! `refpool allocate`

use super::{parse_timestamp, read_json, write_json};
use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use primitive_types::U256;
use refpool_core::rewards::{
    RewardStrategy, TracingExclusionReporter, allocate, cap_from_proportion,
    get_referrer_metrics_from_kpi,
};
use refpool_sdk::objects::{
    Address, ExclusionList, KpiRow, SafeTransactionBatch, parse_amount, parse_units,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// Share proportional to KPI
    Linear,
    /// Share proportional to the square root of KPI
    Sqrt,
    /// Linear share with a per-referrer cap
    Capped,
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// KPI rows as JSON: [{"referrerId", "userAddress", "kpi"}]
    #[arg(short, long)]
    pub kpi: PathBuf,

    /// Excluded referrers as JSON: [{"referrerId", "shouldWarn"}]
    #[arg(long)]
    pub excluded: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = StrategyKind::Linear)]
    pub strategy: StrategyKind,

    /// Reward pool in the token's smallest unit
    #[arg(long, required_unless_present = "reward_tokens", conflicts_with = "reward_tokens")]
    pub reward_amount: Option<String>,

    /// Reward pool in whole tokens (e.g. 15000), scaled by --decimals
    #[arg(long)]
    pub reward_tokens: Option<Decimal>,

    #[arg(long, default_value_t = 18)]
    pub decimals: u32,

    /// Largest share of the pool one referrer can earn (e.g. 0.2)
    #[arg(short, long, required_if_eq("strategy", "capped"))]
    pub maximum_reward_proportion: Option<Decimal>,

    /// Campaign period start (RFC 3339)
    #[arg(short, long, value_parser = parse_timestamp)]
    pub start_timestamp: OffsetDateTime,

    /// Campaign period end, exclusive (RFC 3339)
    #[arg(short, long, value_parser = parse_timestamp)]
    pub end_timestamp: OffsetDateTime,

    /// Emit a Safe transaction batch calling addRewards on this contract
    #[arg(long)]
    pub reward_pool_address: Option<Address>,

    #[arg(short, long, default_value = "rewards")]
    pub output_dir: PathBuf,
}

impl AllocateArgs {
    fn reward_pool(&self) -> anyhow::Result<U256> {
        match (&self.reward_amount, self.reward_tokens) {
            (Some(amount), _) => Ok(parse_amount(amount)?),
            (None, Some(tokens)) => Ok(parse_units(tokens, self.decimals)?),
            (None, None) => bail!("either --reward-amount or --reward-tokens is required"),
        }
    }

    fn resolve_strategy(&self, pool: U256) -> anyhow::Result<RewardStrategy> {
        Ok(match self.strategy {
            StrategyKind::Linear => RewardStrategy::Linear,
            StrategyKind::Sqrt => RewardStrategy::Sqrt,
            StrategyKind::Capped => {
                let proportion = self
                    .maximum_reward_proportion
                    .context("--maximum-reward-proportion is required for capped allocation")?;
                RewardStrategy::Capped {
                    cap: cap_from_proportion(pool, proportion)?,
                }
            }
        })
    }
}

pub fn run(args: AllocateArgs) -> anyhow::Result<()> {
    if args.end_timestamp <= args.start_timestamp {
        bail!("--end-timestamp must be after --start-timestamp");
    }

    let pool = args.reward_pool()?;
    let strategy = args.resolve_strategy(pool)?;

    let kpi_rows: Vec<KpiRow> = read_json(&args.kpi)?;
    let excluded: ExclusionList = match &args.excluded {
        Some(path) => read_json(path)?,
        None => ExclusionList::new(),
    };
    tracing::info!(
        rows = kpi_rows.len(),
        excluded = excluded.len(),
        strategy = strategy.name(),
        "Loaded KPI data"
    );

    let metrics = get_referrer_metrics_from_kpi(&kpi_rows)?;
    let rewards = allocate(strategy, &metrics, pool, &excluded, &TracingExclusionReporter)?;

    write_json(&args.output_dir.join("excluded-referrers.json"), &excluded)?;
    write_json(&args.output_dir.join("rewards.json"), &rewards)?;
    if let Some(reward_pool) = args.reward_pool_address {
        let batch = SafeTransactionBatch::add_rewards(
            reward_pool,
            &rewards,
            args.start_timestamp,
            args.end_timestamp,
        );
        write_json(&args.output_dir.join("safe-transactions.json"), &batch)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: AllocateArgs,
    }

    fn parse(extra: &[&str]) -> Result<AllocateArgs, clap::Error> {
        let mut argv = vec![
            "refpool",
            "--kpi",
            "kpi.json",
            "--start-timestamp",
            "2025-05-01T00:00:00Z",
            "--end-timestamp",
            "2025-06-01T00:00:00Z",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).map(|cli| cli.args)
    }

    #[test]
    fn test_reward_tokens_are_scaled() {
        let args = parse(&["--reward-tokens", "15000"]).unwrap();
        assert_eq!(args.reward_pool().unwrap(), U256::from(15000u64) * U256::exp10(18));

        let args = parse(&["--reward-tokens", "1.5", "--decimals", "6"]).unwrap();
        assert_eq!(args.reward_pool().unwrap(), U256::from(1_500_000u64));
    }

    #[test]
    fn test_reward_amount_must_be_non_negative() {
        let args = parse(&["--reward-amount", "1000"]).unwrap();
        assert_eq!(args.reward_pool().unwrap(), U256::from(1000u64));

        let args = parse(&["--reward-amount=-5"]).unwrap();
        assert!(args.reward_pool().is_err());
    }

    #[test]
    fn test_pool_is_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--reward-amount", "1", "--reward-tokens", "1"]).is_err());
    }

    #[test]
    fn test_capped_requires_proportion() {
        assert!(parse(&["--reward-amount", "1000", "--strategy", "capped"]).is_err());

        let args = parse(&[
            "--reward-amount",
            "1000",
            "--strategy",
            "capped",
            "-m",
            "0.2",
        ])
        .unwrap();
        let strategy = args.resolve_strategy(U256::from(1000u64)).unwrap();
        assert_eq!(
            strategy,
            RewardStrategy::Capped {
                cap: U256::from(200u64)
            }
        );
    }
}
