//! # rates-runner
//!
//! Command-line entry point for the exchange-rate service.
//!
//! Loads an optional JSON configuration file, builds the provider list and
//! either keeps the rate cache fresh in the background (`watch`), does a
//! one-shot refresh (`rates`), or prints the sync checkpoint for a wallet
//! creation date (`checkpoint`).
//!
//! # Usage
//!
//! ```bash
//! rates-runner --config rates.json watch
//! rates-runner rates --code eur
//! rates-runner checkpoint --created 1600000000
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rates_core::checkpoint::Checkpoints;
use rates_core::config::{AppConfig, load_config};
use rates_core::time_util;
use rates_feed::scheduler::MIN_PERIOD;
use rates_feed::{PriceFetcher, RefreshScheduler};
use tracing::{error, info};

/// Coin exchange-rate service.
#[derive(Parser)]
#[command(name = "rates-runner", about = "Coin exchange-rate feed runner")]
struct Cli {
    /// Configuration file path (JSON). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh on the configured interval and log rates until Ctrl+C (default).
    Watch,
    /// Refresh once and print rates.
    Rates {
        /// Print only this currency (case-insensitive).
        #[arg(long)]
        code: Option<String>,
    },
    /// Print the sync checkpoint for a wallet creation date.
    Checkpoint {
        /// Wallet creation time, unix seconds (default: now).
        #[arg(long)]
        created: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    rates_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "rates-runner");

    // 2. Load configuration
    let config = match &cli.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            load_config(path)?
        }
        None => AppConfig::default(),
    };

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => watch(&config).await,
        Command::Rates { code } => print_rates(&config, code.as_deref()).await,
        Command::Checkpoint { created } => print_checkpoint(created.unwrap_or_else(time_util::now_secs)),
    }
}

async fn watch(config: &AppConfig) -> Result<()> {
    let fetcher = Arc::new(PriceFetcher::from_config(config)?);
    for (name, url) in fetcher.provider_endpoints() {
        info!("provider {name}: {url}");
    }

    let mut scheduler = RefreshScheduler::start(Arc::clone(&fetcher), config.refresh_interval());
    let mut report = report_ticker(config.refresh_interval());

    loop {
        tokio::select! {
            _ = report.tick() => {
                let rates = fetcher.get_all_rates(true).await?;
                match fetcher.last_updated_ms().await {
                    Some(ts) => info!("{} rate(s) cached, updated at {ts} ms", rates.len()),
                    None => info!("no rates cached yet"),
                }
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("shutdown signal received");
                break;
            }
        }
    }

    scheduler.stop().await;
    info!("scheduler stopped — goodbye");
    Ok(())
}

/// Status ticker whose first tick lands one `period` from now, after the
/// scheduler's initial refresh has had its chance to fill the cache.
fn report_ticker(period: Duration) -> tokio::time::Interval {
    let period = period.max(MIN_PERIOD);
    tokio::time::interval_at(tokio::time::Instant::now() + period, period)
}

async fn print_rates(config: &AppConfig, code: Option<&str>) -> Result<()> {
    let fetcher = PriceFetcher::from_config(config)?;

    if let Some(code) = code {
        match fetcher.get_latest_rate(code).await {
            Ok(price) => println!("{} {price}", rates_core::normalize(code)),
            Err(e) => {
                error!("lookup failed: {e}");
                return Err(e.into());
            }
        }
        return Ok(());
    }

    let rates = fetcher.get_all_rates(false).await?;
    let mut sorted: Vec<_> = rates.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    for (code, price) in sorted {
        println!("{code:<6} {price}");
    }
    println!("units per coin: {}", fetcher.units_per_coin());
    Ok(())
}

fn print_checkpoint(created_at_secs: u64) -> Result<()> {
    let table = Checkpoints::mainnet()?;
    let cp = table.select(created_at_secs);
    println!("height         {}", cp.height);
    println!("block hash     {}", cp.block_hash);
    println!("header sha256d {}", cp.header.sha256d_hex());
    println!("timestamp      {}", cp.header.timestamp);
    println!("bits           {}", cp.header.bits);
    Ok(())
}
