//! stockpile-rates CLI - Operator tool for the currency engine
//!
//! ## Example Usage
//!
//! ```bash
//! # Refresh the cached rate table
//! stockpile-rates refresh
//!
//! # Convert a display amount into the storage currency
//! stockpile-rates convert 19.99 --selection "USD - US Dollar" --to-base
//!
//! # Show cache state
//! stockpile-rates info
//!
//! # List selectable currencies
//! stockpile-rates currencies
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use stockpile::currency::BASE_CURRENCY;
use stockpile::engine::CurrencyEngine;
use stockpile::error::Result;
use stockpile::rates::HttpRateSource;
use std::process;

/// stockpile-rates: currency engine operator tool
#[derive(Parser)]
#[command(name = "stockpile-rates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exchange-rate cache and currency conversion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the cached exchange-rate table
    Refresh,

    /// Convert an amount between display and storage currency
    Convert {
        /// Amount to convert
        amount: f64,

        /// Display-currency selection, e.g. "USD - US Dollar"
        #[arg(short, long)]
        selection: String,

        /// Convert display -> storage instead of storage -> display
        #[arg(long)]
        to_base: bool,
    },

    /// Show cache state and the current selection
    Info,

    /// List currencies available for selection
    Currencies,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let engine = CurrencyEngine::with_defaults()?;

    match cli.command {
        Commands::Refresh => {
            engine.refresh().await;
            let snapshot = engine.snapshot();
            match &snapshot.last_error {
                None => {
                    println!(
                        "{} {} rates cached",
                        "ok:".green().bold(),
                        snapshot.rates.len()
                    );
                }
                Some(err) => {
                    println!("{} {} (degraded rates in use)", "warn:".yellow().bold(), err);
                }
            }
        }

        Commands::Convert {
            amount,
            selection,
            to_base,
        } => {
            engine.refresh().await;
            if to_base {
                let converted = engine.convert_to_base(amount, &selection);
                println!(
                    "{} -> {}",
                    engine.format(amount, Some(&selection)),
                    engine.format(converted, Some(BASE_CURRENCY))
                );
            } else {
                let converted = engine.convert_from_base(amount, &selection);
                println!(
                    "{} -> {}",
                    engine.format(amount, Some(BASE_CURRENCY)),
                    engine.format(converted, Some(&selection))
                );
            }
        }

        Commands::Info => {
            let snapshot = engine.snapshot();
            println!("selection:    {}", engine.display_selection().bold());
            println!("cached rates: {}", snapshot.rates.len());
            println!(
                "last fetched: {}",
                snapshot
                    .last_fetched_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
            );
            if let Some(err) = &snapshot.last_error {
                println!("last error:   {}", err.yellow());
            }
        }

        Commands::Currencies => {
            let source = HttpRateSource::new()?;
            let listings = source.fetch_currency_directory().await?;
            for listing in listings {
                println!("{:>6}  {}", listing.symbol, listing.as_selection());
            }
        }
    }

    Ok(())
}
