//! Error taxonomy for configuration and simulation failures
//!
//! Every variant is fatal. Policy clamps (deposit ceiling, emission limits)
//! are not errors and never surface here.

use amm_model::AmmError;
use thiserror::Error;

use crate::state::ProtocolState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("total supply must be positive")]
    ZeroSupply,

    #[error("initial pool reserves must both be positive (reward {reward}, stable {stable})")]
    DegeneratePool { reward: u64, stable: u64 },

    #[error("initial pool reward {pool} exceeds total supply {supply}")]
    PoolExceedsSupply { pool: u64, supply: u64 },

    #[error("campaign count must be at least 1")]
    NoCampaigns,

    #[error("sampling interval must be at least 1")]
    ZeroSamplingInterval,

    #[error("{name} bounds are inverted ({min} > {max})")]
    InvertedBounds { name: &'static str, min: u64, max: u64 },

    #[error("{name} = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} = {value} must be finite and non-negative")]
    BadExponent { name: &'static str, value: f64 },

    #[error("{name} = {value} exceeds the basis point scale {scale}")]
    BpsOutOfRange { name: &'static str, value: u32, scale: u32 },

    #[error("basis point scale must be positive")]
    ZeroBpsScale,

    #[error("sell-back percentage {0} exceeds 100")]
    SellBackOutOfRange(u32),

    #[error("{0} overflows the micro-unit range")]
    Overflow(&'static str),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Logic defects detected during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// The sizer and the raw swap disagree on the reward freed
    #[error("swap cross-check failed: sizer freed {sized}, raw swap freed {recomputed}")]
    SwapMismatch { sized: u64, recomputed: u64 },

    /// A treasury debit exceeded the balance
    #[error("treasury overdrawn: debit {debit} against balance {balance}")]
    TreasuryOverdrawn { balance: u64, debit: u64 },

    /// A reserve debit exceeded the reserve
    #[error("reserve overdrawn: debit {debit} against reserve {reserve}")]
    ReserveOverdrawn { reserve: u64, debit: u64 },

    /// A credit overflowed a u64 balance
    #[error("balance overflow: credit {credit} onto {balance}")]
    BalanceOverflow { balance: u64, credit: u64 },

    /// treasury + pool reward + held emissions != total supply
    #[error("conservation broken: accounted {accounted} != supply {supply}")]
    Conservation { accounted: u128, supply: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("campaign {campaign}: pool math failed: {error}")]
    Amm { campaign: u64, error: AmmError },

    #[error("campaign {campaign}: {violation} (state: {snapshot:?})")]
    Invariant {
        campaign: u64,
        #[source]
        violation: Violation,
        snapshot: ProtocolState,
    },
}

impl SimError {
    /// Campaign index the error was raised at, if any
    pub fn campaign(&self) -> Option<u64> {
        match self {
            SimError::Config(_) => None,
            SimError::Amm { campaign, .. } | SimError::Invariant { campaign, .. } => Some(*campaign),
        }
    }
}
