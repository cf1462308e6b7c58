//! Campaign simulation loop
//!
//! Each campaign, in order:
//! 1. take the campaign fee (fixed seed fee for campaign 1)
//! 2. size the swap from the circulating fraction
//! 3. swap, then deposit the remainder with matched reward tokens
//! 4. emit the swap excess, then treasury rewards up to the liquidation ceiling
//! 5. sell back part of the previous campaign's emission
//!
//! Campaign i+1 starts from the reserves campaign i left, so the loop is
//! strictly sequential.

use amm_model::{mul_div_round, size_swap, swap_out, units, AmmError, FeeRate};
use log::{debug, info, trace};

use crate::config::ProtocolConfig;
use crate::deposit::{BiasedDeposits, DepositBounds, DepositSource};
use crate::error::{ConfigError, SimError, Violation};
use crate::report::{Campaign, RunSummary, Sampler, SimulationReport};
use crate::state::{Pool, ProtocolState};

/// Upper bound on the up-front record reservation; longer runs grow the Vec
const MAX_PREALLOCATED_RECORDS: u64 = 1 << 16;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Last campaign completed
    Running(u64),
    Completed,
    /// Stopped by a fatal error at this campaign
    Aborted(u64),
}

/// Config values pre-scaled for the hot loop
#[derive(Debug, Clone, Copy)]
struct Params {
    campaigns: u64,
    seed_deposit: u64,
    fee: FeeRate,
    max_bps: u32,
    reward_share_bps: u32,
    sell_back_pct: u32,
    ceiling_buffer_bps: u32,
    surplus_exponent: f64,
}

enum StepError {
    Amm(AmmError),
    Violation(Violation),
}

impl From<AmmError> for StepError {
    fn from(e: AmmError) -> Self {
        StepError::Amm(e)
    }
}

impl From<Violation> for StepError {
    fn from(v: Violation) -> Self {
        StepError::Violation(v)
    }
}

pub struct Simulation<D> {
    config: ProtocolConfig,
    params: Params,
    state: ProtocolState,
    deposits: D,
    phase: Phase,
}

impl Simulation<BiasedDeposits> {
    /// Simulation with the biased deposit generator
    ///
    /// Without a configured seed one is drawn from entropy and written back
    /// into the config, so the summary always names a seed that reproduces
    /// the run.
    pub fn from_config(mut config: ProtocolConfig) -> Result<Self, SimError> {
        let seed = *config.seed.get_or_insert_with(rand::random);
        let deposits = BiasedDeposits::seeded(DepositBounds::from_config(&config), seed);
        Self::new(config, deposits)
    }
}

impl<D: DepositSource> Simulation<D> {
    pub fn new(config: ProtocolConfig, deposits: D) -> Result<Self, SimError> {
        config.validate()?;

        let scale = |name: &'static str, v: u64| units(v).map_err(|_| ConfigError::Overflow(name));
        let pool = Pool {
            reward: scale("initial_pool_reward", config.initial_pool_reward)?,
            stable: scale("initial_pool_stable", config.initial_pool_stable)?,
        };
        let total_supply = scale("total_supply", config.total_supply)?;
        let state = ProtocolState::new(total_supply, pool).map_err(|_| ConfigError::PoolExceedsSupply {
            pool: config.initial_pool_reward,
            supply: config.total_supply,
        })?;

        let params = Params {
            campaigns: config.campaigns,
            seed_deposit: scale("seed_deposit", config.seed_deposit)?,
            fee: config.fee_rate(),
            max_bps: config.max_bps,
            reward_share_bps: config.reward_share_bps,
            sell_back_pct: config.sell_back_pct,
            ceiling_buffer_bps: config.ceiling_buffer_bps,
            surplus_exponent: config.surplus_exponent,
        };

        Ok(Self { config, params, state, deposits, phase: Phase::Idle })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the next campaign; `None` once the run has finished or aborted
    pub fn step(&mut self) -> Result<Option<Campaign>, SimError> {
        let index = match self.phase {
            Phase::Idle => {
                info!(
                    "starting run: {} campaigns, seed {:?}",
                    self.params.campaigns, self.config.seed
                );
                1
            }
            Phase::Running(last) => last + 1,
            Phase::Completed | Phase::Aborted(_) => return Ok(None),
        };

        match self.transition(index) {
            Ok(campaign) => {
                self.phase = if index >= self.params.campaigns {
                    info!(
                        "run complete: treasury {} pool {:?} emitted {}",
                        self.state.treasury, self.state.pool, self.state.total_emitted
                    );
                    Phase::Completed
                } else {
                    Phase::Running(index)
                };
                Ok(Some(campaign))
            }
            Err(e) => {
                self.phase = Phase::Aborted(index);
                Err(match e {
                    StepError::Amm(error) => SimError::Amm { campaign: index, error },
                    StepError::Violation(violation) => SimError::Invariant {
                        campaign: index,
                        violation,
                        snapshot: self.state.clone(),
                    },
                })
            }
        }
    }

    /// Drive the run to completion, keeping only sampled campaigns
    pub fn run(mut self) -> Result<SimulationReport, SimError> {
        let sampler = Sampler::new(self.config.sample_every, self.params.campaigns);
        let mut records = Vec::with_capacity(record_capacity(self.params.campaigns, self.config.sample_every));

        while let Some(campaign) = self.step()? {
            if sampler.should_sample(campaign.index) {
                debug!(
                    "campaign {}: fee {} emit {} treasury {} price {:.6}",
                    campaign.index,
                    campaign.fee,
                    campaign.total_emission,
                    campaign.treasury,
                    campaign.spot_price()
                );
                records.push(campaign);
            }
        }

        let summary = RunSummary::from_state(&self.state, self.params.campaigns, self.config.seed);
        Ok(SimulationReport { records, summary })
    }

    /// Surplus skew: round(max_bps · c · c^exp), capped at max_bps
    fn surplus_bps(&self, circulating: f64) -> u32 {
        let max = self.params.max_bps as f64;
        let bps = (max * circulating * circulating.powf(self.params.surplus_exponent)).round();
        bps.clamp(0.0, max) as u32
    }

    fn transition(&mut self, index: u64) -> Result<Campaign, StepError> {
        let p = self.params;
        let fee = if index == 1 {
            p.seed_deposit
        } else {
            self.deposits.next_fee(index, p.campaigns)?
        };

        let start = self.state.pool;
        let surplus_bps = self.surplus_bps(self.state.circulating_fraction());
        let plan = size_swap(fee, start.stable, start.reward, surplus_bps, p.fee)?;

        // Oracle: the sizer must agree with the raw swap on the starting pool
        let recomputed = swap_out(plan.swap_amount, start.stable, start.reward, p.fee)?;
        if recomputed != plan.reward_freed {
            return Err(Violation::SwapMismatch { sized: plan.reward_freed, recomputed }.into());
        }

        let st = &mut self.state;

        st.pool.add_stable(plan.swap_amount)?;
        st.pool.remove_reward(plan.reward_freed)?;
        st.credit_treasury(plan.reward_freed)?;

        st.pool.add_stable(plan.stable_remainder(fee))?;
        st.pool.add_reward(plan.matched_reward_needed)?;
        st.debit_treasury(plan.matched_reward_needed)?;

        let swap_emission = plan.excess_reward().max(0) as u64;
        st.debit_treasury(swap_emission)?;

        let max_sellable = liquidation_ceiling(start.tvl(), st.pool, p.ceiling_buffer_bps, p.max_bps)?;
        let base = plan.reward_freed.saturating_sub(swap_emission).min(max_sellable);
        let mut treasury_emission =
            mul_div_round(base as u128, p.reward_share_bps as u128, p.max_bps as u128)? as u64;
        if treasury_emission > st.treasury {
            debug!(
                "campaign {index}: treasury emission {treasury_emission} clamped to balance {}",
                st.treasury
            );
            treasury_emission = st.treasury;
        }
        st.debit_treasury(treasury_emission)?;

        let total_emission = swap_emission + treasury_emission;
        st.total_emitted = st
            .total_emitted
            .checked_add(total_emission)
            .ok_or(Violation::BalanceOverflow { balance: st.total_emitted, credit: total_emission })?;

        // Recipients of the previous campaign cash out against today's pool
        let sold_back = mul_div_round(st.previous_emission as u128, p.sell_back_pct as u128, 100)? as u64;
        let sold_back_proceeds = if sold_back > 0 {
            let out = swap_out(sold_back, st.pool.reward, st.pool.stable, p.fee)?;
            st.pool.remove_stable(out)?;
            st.pool.add_reward(sold_back)?;
            st.total_sold_back += sold_back;
            out
        } else {
            0
        };
        st.previous_emission = total_emission;

        st.check_conservation()?;

        trace!(
            "campaign {index}: fee {fee} swap {} freed {} matched {} ceiling {max_sellable} emit {total_emission} sold {sold_back}",
            plan.swap_amount,
            plan.reward_freed,
            plan.matched_reward_needed
        );

        Ok(Campaign {
            index,
            fee,
            swap_amount: plan.swap_amount,
            reward_freed: plan.reward_freed,
            matched_reward: plan.matched_reward_needed,
            max_sellable,
            treasury_emission,
            swap_emission,
            surplus_bps,
            total_emission,
            sold_back,
            sold_back_proceeds,
            treasury: st.treasury,
            pool: st.pool,
            circulating_supply: st.circulating_supply(),
            circulating_fraction: st.circulating_fraction(),
        })
    }
}

/// Sampled record count for a run, capped for the up-front reservation
fn record_capacity(campaigns: u64, sample_every: u64) -> usize {
    let expected = (campaigns / sample_every.max(1)).saturating_add(2);
    expected.min(MAX_PREALLOCATED_RECORDS) as usize
}

/// Reward the treasury may sell given how much the pool's TVL grew
///
/// round(reward × (tvl_now − tvl_start) / tvl_start × buffer), zero when TVL
/// did not grow.
pub fn liquidation_ceiling(
    start_tvl: u128,
    pool: Pool,
    buffer_bps: u32,
    max_bps: u32,
) -> Result<u64, AmmError> {
    let tvl = pool.tvl();
    if tvl <= start_tvl {
        return Ok(0);
    }
    let growth = (pool.reward as u128)
        .checked_mul(tvl - start_tvl)
        .ok_or(AmmError::Overflow)?;
    let denom = start_tvl.checked_mul(max_bps as u128).ok_or(AmmError::Overflow)?;
    let ceiling = mul_div_round(growth, buffer_bps as u128, denom)?;
    u64::try_from(ceiling).map_err(|_| AmmError::Overflow)
}
