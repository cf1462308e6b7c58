//! Campaign records, sampling and display formatting

use amm_model::UNIT;
use serde::Serialize;

use crate::state::{Pool, ProtocolState};

/// Full outcome of one campaign, in micro-units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub index: u64,
    pub fee: u64,
    pub swap_amount: u64,
    pub reward_freed: u64,
    pub matched_reward: u64,
    /// Liquidation ceiling for treasury emission
    pub max_sellable: u64,
    pub treasury_emission: u64,
    pub swap_emission: u64,
    pub surplus_bps: u32,
    pub total_emission: u64,
    /// Previous campaign's rewards sold into the pool this campaign
    pub sold_back: u64,
    pub sold_back_proceeds: u64,
    pub treasury: u64,
    /// Reserves after the sell-back
    pub pool: Pool,
    pub circulating_supply: u64,
    pub circulating_fraction: f64,
}

impl Campaign {
    pub fn spot_price(&self) -> f64 {
        self.pool.spot_price()
    }

    /// Emission relative to the liquidation ceiling; None when the ceiling is zero
    pub fn emission_to_ceiling(&self) -> Option<f64> {
        if self.max_sellable == 0 {
            return None;
        }
        Some(self.total_emission as f64 / self.max_sellable as f64)
    }

    pub fn to_row(&self) -> CampaignRow {
        CampaignRow {
            campaign: self.index,
            fee: format_units(self.fee, 2),
            swap_in: format_units(self.swap_amount, 2),
            reward_freed: format_units(self.reward_freed, 2),
            matched_reward: format_units(self.matched_reward, 2),
            max_emit: format_units(self.max_sellable, 2),
            treasury_emit: format_units(self.treasury_emission, 2),
            swap_emit: format_units(self.swap_emission, 2),
            surplus_bps: self.surplus_bps,
            total_emit: format_units(self.total_emission, 2),
            pct_of_max: match self.emission_to_ceiling() {
                Some(r) => format!("{r:.2}"),
                None => "n/a".to_string(),
            },
            treasury: format_units(self.treasury, 0),
            pool_reward: format_units(self.pool.reward, 0),
            pool_stable: format_units(self.pool.stable, 0),
            price: format!("{:.4}", self.spot_price()),
            circulating: format_units(self.circulating_supply, 0),
            circulating_pct: format!("{:.2}", self.circulating_fraction),
        }
    }
}

/// Display form of a sampled campaign, micro-unit scaling removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRow {
    pub campaign: u64,
    pub fee: String,
    pub swap_in: String,
    pub reward_freed: String,
    pub matched_reward: String,
    pub max_emit: String,
    pub treasury_emit: String,
    pub swap_emit: String,
    pub surplus_bps: u32,
    pub total_emit: String,
    pub pct_of_max: String,
    pub treasury: String,
    pub pool_reward: String,
    pub pool_stable: String,
    pub price: String,
    pub circulating: String,
    pub circulating_pct: String,
}

/// Picks campaigns 1, N and every interval-th in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    interval: u64,
    last: u64,
}

impl Sampler {
    pub fn new(interval: u64, last: u64) -> Self {
        Self { interval: interval.max(1), last }
    }

    pub fn should_sample(&self, index: u64) -> bool {
        index == 1 || index == self.last || index % self.interval == 0
    }
}

/// End-of-run totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub campaigns: u64,
    pub seed: Option<u64>,
    pub treasury: u64,
    pub pool: Pool,
    pub total_emitted: u64,
    pub total_sold_back: u64,
    pub circulating_supply: u64,
    pub circulating_fraction: f64,
    pub price: f64,
}

impl RunSummary {
    pub fn from_state(state: &ProtocolState, campaigns: u64, seed: Option<u64>) -> Self {
        Self {
            campaigns,
            seed,
            treasury: state.treasury,
            pool: state.pool,
            total_emitted: state.total_emitted,
            total_sold_back: state.total_sold_back,
            circulating_supply: state.circulating_supply(),
            circulating_fraction: state.circulating_fraction(),
            price: state.pool.spot_price(),
        }
    }
}

/// Sampled records plus the final state of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub records: Vec<Campaign>,
    pub summary: RunSummary,
}

impl SimulationReport {
    pub fn rows(&self) -> Vec<CampaignRow> {
        self.records.iter().map(Campaign::to_row).collect()
    }
}

/// Format micro-units as a decimal string with `decimals` places (max 7)
///
/// Rounds half up at the last kept digit.
pub fn format_units(value: u64, decimals: u32) -> String {
    let decimals = decimals.min(7);
    let step = 10u128.pow(7 - decimals);
    let rounded = (value as u128 + step / 2) / step;

    if decimals == 0 {
        return rounded.to_string();
    }
    let per_unit = UNIT as u128 / step;
    format!(
        "{}.{:0width$}",
        rounded / per_unit,
        rounded % per_unit,
        width = decimals as usize
    )
}
