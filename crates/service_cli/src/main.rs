//! Lattice Pricer CLI - Command Line Operations for Vanilla Option Pricing
//!
//! This is the operational entry point for the lattice option pricing
//! library.
//!
//! # Commands
//!
//! - `lattice-pricer price --spot 100 --strike 100 --maturity 1 --rate 0.02 --vol 0.2`
//!   - Price with all three models and print the aggregate result
//! - `lattice-pricer validate --spot 100 --strike 100 --maturity 1 --rate 0.02 --vol 0.2`
//!   - Run only the cross-model validation battery
//!
//! # Architecture
//!
//! As the service layer of the workspace, this crate orchestrates the
//! pricing layers to provide a unified command-line interface.

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricer_core::types::MarketParams;

mod commands;
mod error;

pub use error::{CliError, Result};

/// Lattice Option Pricer CLI
#[derive(Parser)]
#[command(name = "lattice-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Market parameters shared by every subcommand.
#[derive(Args)]
struct MarketArgs {
    /// Current stock price
    #[arg(long)]
    spot: f64,

    /// Strike price
    #[arg(long)]
    strike: f64,

    /// Time to maturity in years
    #[arg(long)]
    maturity: f64,

    /// Risk-free rate, annualised (e.g. 0.02)
    #[arg(long)]
    rate: f64,

    /// Volatility (e.g. 0.20)
    #[arg(long)]
    vol: f64,

    /// Lattice step count
    #[arg(long, default_value = "250")]
    steps: usize,

    /// Continuous dividend yield
    #[arg(long, default_value = "0.0")]
    dividend_yield: f64,
}

impl MarketArgs {
    fn to_params(&self) -> Result<MarketParams> {
        Ok(MarketParams::new(
            self.spot,
            self.strike,
            self.maturity,
            self.rate,
            self.vol,
            self.dividend_yield,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price with Black-Scholes, binomial, and trinomial models
    Price {
        #[command(flatten)]
        market: MarketArgs,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Run the cross-model validation battery
    Validate {
        #[command(flatten)]
        market: MarketArgs,
    },
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Price { market, format } => {
            let params = market.to_params()?;
            commands::price::run(&params, market.steps, &format)
        }
        Commands::Validate { market } => {
            let params = market.to_params()?;
            commands::validate::run(&params, market.steps)
        }
    }
}
