//! Flashsim CLI - Campaign tokenomics simulator
//!
//! Runs the campaign simulation over a constant product pool and exposes
//! the pool math (swap quotes, swap sizing, reward splits) for one-off
//! calculations.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod config;
mod pool;
mod rewards;
mod simulate;

#[derive(Parser)]
#[command(name = "flashsim")]
#[command(about = "Flashsim - Simulate reward token campaigns over a constant product pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the campaign simulation
    Run {
        /// Protocol config file (TOML); omitted fields keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for the deposit generator
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of campaigns to run
        #[arg(long)]
        campaigns: Option<u64>,

        /// Report every N-th campaign (plus the first and last)
        #[arg(long)]
        sample_every: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Quote a single swap against a pool
    Quote {
        /// Amount in (whole tokens, decimals allowed)
        #[arg(long)]
        amount_in: String,

        /// Reserve of the input token
        #[arg(long)]
        reserve_in: String,

        /// Reserve of the output token
        #[arg(long)]
        reserve_out: String,

        /// Swap fee (basis points)
        #[arg(long, default_value = "30")]
        fee_bps: u32,
    },

    /// Size the swap leg of a campaign fee
    Size {
        /// Campaign fee in stable tokens
        #[arg(long)]
        fee: String,

        /// Stable reserve of the pool
        #[arg(long)]
        reserve_stable: String,

        /// Reward reserve of the pool
        #[arg(long)]
        reserve_reward: String,

        /// Share of the fee swapped beyond the minimum (basis points)
        #[arg(long, default_value = "0")]
        surplus_bps: u32,

        /// Swap fee (basis points)
        #[arg(long, default_value = "30")]
        fee_bps: u32,
    },

    /// Split an emission across ranked participants
    Distribute {
        /// Emission to split (whole tokens)
        #[arg(long)]
        emission: String,

        /// Deposits in rank order, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        deposits: Vec<String>,

        /// Campaign target; deposits at or above it get full weight
        #[arg(long)]
        target: String,

        /// Rank decay exponent
        #[arg(long, default_value = "1")]
        gamma: u32,
    },

    /// Print the default protocol config as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { config, seed, campaigns, sample_every, format } => {
            let overrides = config::Overrides { seed, campaigns, sample_every };
            let protocol = config::load(config.as_deref(), &overrides)?;
            simulate::run_simulation(protocol, format)?;
        }
        Commands::Quote { amount_in, reserve_in, reserve_out, fee_bps } => {
            pool::quote(&amount_in, &reserve_in, &reserve_out, fee_bps)?;
        }
        Commands::Size { fee, reserve_stable, reserve_reward, surplus_bps, fee_bps } => {
            pool::size(&fee, &reserve_stable, &reserve_reward, surplus_bps, fee_bps)?;
        }
        Commands::Distribute { emission, deposits, target, gamma } => {
            rewards::distribute(&emission, &deposits, &target, gamma)?;
        }
        Commands::Config => {
            print!("{}", config::default_toml()?);
        }
    }

    Ok(())
}
