//! Campaign Model - Tokenomics simulation over a constant product pool
//!
//! Models how a reward token's treasury, pool reserves and circulating
//! supply evolve across a long run of campaigns, each funded by a stable
//! token fee that is partly swapped into the pool and partly added as
//! matched liquidity.
//!
//! ```no_run
//! use campaign_model::{ProtocolConfig, Simulation};
//!
//! let config = ProtocolConfig { seed: Some(7), ..Default::default() };
//! let report = Simulation::from_config(config)?.run()?;
//! println!("{} sampled campaigns", report.records.len());
//! # Ok::<(), campaign_model::SimError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod deposit;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod report;
pub mod state;

pub use config::ProtocolConfig;
pub use deposit::{BiasedDeposits, DepositBounds, DepositSource, FixedDeposits};
pub use engine::{liquidation_ceiling, Phase, Simulation};
pub use error::{ConfigError, SimError, Violation};
pub use report::{format_units, Campaign, CampaignRow, RunSummary, Sampler, SimulationReport};
pub use state::{Pool, ProtocolState};
