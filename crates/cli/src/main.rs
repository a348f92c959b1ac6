use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use virtual_wallet_core::errors::CoreError;
use virtual_wallet_core::models::settings::{
    WalletSettings, DEFAULT_PRICE_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use virtual_wallet_core::models::symbol::Symbol;
use virtual_wallet_core::services::valuation_service::format_usd;
use virtual_wallet_core::storage::file::FileStore;
use virtual_wallet_core::{parse_amount, VirtualWallet};

#[derive(Parser, Debug)]
#[command(name = "vwallet", version, about = "Track a virtual BTC/ETH wallet")]
struct Args {
    /// JSON file holding balances and history
    #[arg(long, env = "VWALLET_STORE", default_value = "wallet.json")]
    store: PathBuf,

    /// Base URL of the exchange-rate API
    #[arg(long, env = "VWALLET_PRICE_API_URL", default_value = DEFAULT_PRICE_API_URL)]
    price_api_url: String,

    /// HTTP timeout for price lookups, in seconds
    #[arg(long, env = "VWALLET_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add an amount of a currency
    Add { symbol: Symbol, amount: String },
    /// Remove an amount of a currency
    Remove { symbol: Symbol, amount: String },
    /// Show current balances
    Balance,
    /// Show the transaction history, newest first
    History,
    /// Delete one history line (0 = newest)
    Delete { index: usize },
    /// Convert an amount to USD at the current price
    Check { symbol: Symbol, amount: String },
    /// Value the whole wallet in USD
    Total,
    /// Print balance lines, holdings pie and current values
    Summary,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("{}=info,virtual_wallet_core=info", env!("CARGO_CRATE_NAME")).into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = WalletSettings {
        price_api_url: args.price_api_url,
        request_timeout_secs: args.timeout_secs,
        ..WalletSettings::default()
    };
    let mut wallet = VirtualWallet::<FileStore>::open_file(&args.store, &settings)
        .with_context(|| format!("opening wallet at {}", args.store.display()))?;

    match args.command {
        Commands::Add { symbol, amount } => {
            let amount = parse_amount(&amount)?;
            let record = wallet.add(symbol, amount)?;
            info!(%symbol, amount, total = record.total, "added");
            print_balances(&wallet)?;
        }
        Commands::Remove { symbol, amount } => {
            let amount = parse_amount(&amount)?;
            match wallet.remove(symbol, amount) {
                Ok(record) => {
                    info!(%symbol, amount, total = record.total, "removed");
                    print_balances(&wallet)?;
                }
                Err(CoreError::InsufficientBalance { available, .. }) => {
                    anyhow::bail!(
                        "You cannot remove more than you have. {symbol} Available: {available}"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Balance => print_balances(&wallet)?,
        Commands::History => {
            let history = wallet.history()?;
            if history.is_empty() {
                println!("No transactions yet.");
            }
            for (index, line) in history.iter().enumerate() {
                println!("[{index}] {line}");
            }
        }
        Commands::Delete { index } => {
            if wallet.delete_history_item(index)? {
                println!("Deleted history entry {index}.");
            } else {
                println!("No history entry at index {index}.");
            }
        }
        Commands::Check { symbol, amount } => {
            let amount = parse_amount(&amount)?;
            let value = wallet.check_amount_usd(symbol, amount).await?;
            println!("{amount} {symbol} → {}", format_usd(value.value_usd, 0));
        }
        Commands::Total => {
            let valuation = wallet.wallet_value().await?;
            println!("Wallet Value:");
            for holding in &valuation.holdings {
                println!(
                    "  {}: {} → {}",
                    holding.symbol,
                    holding.amount,
                    format_usd(holding.value_usd, 2)
                );
            }
            println!("  Total: {}", format_usd(valuation.total_usd, 2));
        }
        Commands::Summary => print_summary(&wallet).await?,
    }

    Ok(())
}

fn print_balances(wallet: &VirtualWallet<FileStore>) -> Result<()> {
    for symbol in Symbol::ALL {
        println!("{symbol}: {}", wallet.balance(symbol)?);
    }
    Ok(())
}

async fn print_summary(wallet: &VirtualWallet<FileStore>) -> Result<()> {
    let summary = wallet.summary().await?;
    if summary.history.is_empty() {
        println!("No data to display.");
        return Ok(());
    }

    println!("Virtual Wallet History");
    for series in &summary.history.series {
        println!();
        println!("{} ({})", series.symbol, series.symbol.name());
        for point in &series.points {
            let movement = point
                .movement
                .map(|m| format!("{m:+}"))
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<20} total {:<12} movement {}", point.label, point.total, movement);
        }
        if let Some(peak) = &series.peak {
            println!("  Max: {} at {}", peak.total, peak.label);
        }
    }

    println!();
    let values: Vec<String> = summary
        .valuation
        .holdings
        .iter()
        .map(|h| format!("{}: {} → {}", h.symbol, h.amount, format_usd(h.value_usd, 2)))
        .collect();
    println!("{}", values.join("   | "));

    if !summary.pie.is_empty() {
        println!();
        println!("Holdings");
        for slice in &summary.pie {
            println!("  {:<12} {:>6.2}%", slice.tooltip(), slice.share * 100.0);
        }
    }

    Ok(())
}
