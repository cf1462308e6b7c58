//! Campaign fee sources
//!
//! The engine pulls one fee per campaign (campaign 1 excepted) from a
//! [`DepositSource`]. Production runs use [`BiasedDeposits`]; tests plug in
//! [`FixedDeposits`] for exact, repeatable streams.

use amm_model::{round_f64, AmmError, UNIT};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ProtocolConfig;

/// Supplies the stable-token fee of each campaign, in micro-units
pub trait DepositSource {
    /// `AmmError::Overflow` when the fee does not fit in micro-units
    fn next_fee(&mut self, campaign: u64, total_campaigns: u64) -> Result<u64, AmmError>;
}

/// Draw ranges and shape of the deposit distribution (whole tokens)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositBounds {
    pub outer_min: f64,
    pub outer_max: f64,
    pub typical_min: f64,
    pub typical_max: f64,
    pub typical_probability: f64,
    pub progress_exponent: f64,
}

impl DepositBounds {
    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            outer_min: config.outer_min as f64,
            outer_max: config.outer_max as f64,
            typical_min: config.typical_min as f64,
            typical_max: config.typical_max as f64,
            typical_probability: config.typical_probability,
            progress_exponent: config.progress_exponent,
        }
    }

    /// Late-run boost `1 + t^exp` for normalized progress t in [0, 1]
    pub fn progress_scale(&self, campaign: u64, total_campaigns: u64) -> f64 {
        let t = if total_campaigns <= 1 {
            0.0
        } else {
            campaign.saturating_sub(1) as f64 / (total_campaigns - 1) as f64
        };
        1.0 + t.powf(self.progress_exponent)
    }
}

/// Skewed random deposits that grow toward the end of a run
///
/// Mostly uniform over the typical range, occasionally uniform over the
/// outer range, scaled by the progress boost and capped at the outer max.
#[derive(Debug, Clone)]
pub struct BiasedDeposits<R = ChaCha8Rng> {
    bounds: DepositBounds,
    rng: R,
}

impl BiasedDeposits<ChaCha8Rng> {
    /// Reproducible generator
    pub fn seeded(bounds: DepositBounds, seed: u64) -> Self {
        Self::new(bounds, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> BiasedDeposits<R> {
    pub fn new(bounds: DepositBounds, rng: R) -> Self {
        Self { bounds, rng }
    }

    /// One draw in whole tokens, after scaling and capping
    pub fn draw(&mut self, campaign: u64, total_campaigns: u64) -> f64 {
        let b = &self.bounds;
        let base = if self.rng.random_bool(b.typical_probability) {
            uniform(&mut self.rng, b.typical_min, b.typical_max)
        } else {
            uniform(&mut self.rng, b.outer_min, b.outer_max)
        };

        let scaled = base * b.progress_scale(campaign, total_campaigns);
        if scaled > b.outer_max {
            debug!("campaign {campaign}: deposit {scaled:.2} capped at {:.2}", b.outer_max);
            b.outer_max
        } else {
            scaled
        }
    }
}

impl<R: Rng> DepositSource for BiasedDeposits<R> {
    fn next_fee(&mut self, campaign: u64, total_campaigns: u64) -> Result<u64, AmmError> {
        let whole = self.draw(campaign, total_campaigns);
        round_f64(whole * UNIT as f64)
    }
}

fn uniform<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.random::<f64>() * (max - min)
}

/// Replays a fixed list of fees, repeating the last one when exhausted
#[derive(Debug, Clone, Default)]
pub struct FixedDeposits {
    fees: Vec<u64>,
    cursor: usize,
}

impl FixedDeposits {
    /// Fees in micro-units
    pub fn new(fees: Vec<u64>) -> Self {
        Self { fees, cursor: 0 }
    }

    /// Same fee every campaign, in micro-units
    pub fn constant(fee: u64) -> Self {
        Self::new(vec![fee])
    }
}

impl DepositSource for FixedDeposits {
    fn next_fee(&mut self, _campaign: u64, _total_campaigns: u64) -> Result<u64, AmmError> {
        let fee = match self.fees.get(self.cursor) {
            Some(fee) => *fee,
            None => self.fees.last().copied().unwrap_or(0),
        };
        self.cursor += 1;
        Ok(fee)
    }
}
