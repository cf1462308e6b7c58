//! Mutable protocol state threaded through the simulation
//!
//! All balances are micro-units. Debits go through the checked helpers so
//! an overdraft surfaces as a [`Violation`] instead of wrapping.

use serde::Serialize;

use crate::error::Violation;

/// Constant product pool reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub reward: u64,
    pub stable: u64,
}

impl Pool {
    /// Stable per reward token
    pub fn spot_price(&self) -> f64 {
        if self.reward == 0 {
            return 0.0;
        }
        self.stable as f64 / self.reward as f64
    }

    /// Total value locked, counted as twice the stable side
    pub fn tvl(&self) -> u128 {
        2 * self.stable as u128
    }

    pub fn add_stable(&mut self, amount: u64) -> Result<(), Violation> {
        self.stable = credit(self.stable, amount)?;
        Ok(())
    }

    pub fn add_reward(&mut self, amount: u64) -> Result<(), Violation> {
        self.reward = credit(self.reward, amount)?;
        Ok(())
    }

    pub fn remove_stable(&mut self, amount: u64) -> Result<(), Violation> {
        self.stable = self
            .stable
            .checked_sub(amount)
            .ok_or(Violation::ReserveOverdrawn { reserve: self.stable, debit: amount })?;
        Ok(())
    }

    pub fn remove_reward(&mut self, amount: u64) -> Result<(), Violation> {
        self.reward = self
            .reward
            .checked_sub(amount)
            .ok_or(Violation::ReserveOverdrawn { reserve: self.reward, debit: amount })?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolState {
    /// Fixed supply in micro-units
    pub total_supply: u64,

    /// Reward tokens neither in the pool nor emitted
    pub treasury: u64,

    pub pool: Pool,

    /// Cumulative rewards emitted
    pub total_emitted: u64,

    /// Cumulative rewards sold back into the pool
    pub total_sold_back: u64,

    /// Emission of the campaign before the current one
    pub previous_emission: u64,
}

impl ProtocolState {
    /// Fresh state: everything outside the seeded pool sits in the treasury
    pub fn new(total_supply: u64, pool: Pool) -> Result<Self, Violation> {
        let treasury = total_supply
            .checked_sub(pool.reward)
            .ok_or(Violation::TreasuryOverdrawn { balance: total_supply, debit: pool.reward })?;

        Ok(Self {
            total_supply,
            treasury,
            pool,
            total_emitted: 0,
            total_sold_back: 0,
            previous_emission: 0,
        })
    }

    pub fn credit_treasury(&mut self, amount: u64) -> Result<(), Violation> {
        self.treasury = credit(self.treasury, amount)?;
        Ok(())
    }

    pub fn debit_treasury(&mut self, amount: u64) -> Result<(), Violation> {
        self.treasury = self
            .treasury
            .checked_sub(amount)
            .ok_or(Violation::TreasuryOverdrawn { balance: self.treasury, debit: amount })?;
        Ok(())
    }

    /// Emitted rewards still held outside the pool
    pub fn held_outside_pool(&self) -> u64 {
        self.total_emitted - self.total_sold_back
    }

    /// Everything that has left the treasury, pool included
    pub fn circulating_supply(&self) -> u64 {
        self.total_supply - self.treasury
    }

    pub fn circulating_fraction(&self) -> f64 {
        self.circulating_supply() as f64 / self.total_supply as f64
    }

    /// treasury + pool reward + held emissions must equal total supply
    pub fn check_conservation(&self) -> Result<(), Violation> {
        let accounted = self.treasury as u128
            + self.pool.reward as u128
            + self.total_emitted as u128
            - self.total_sold_back as u128;

        if accounted != self.total_supply as u128 {
            return Err(Violation::Conservation { accounted, supply: self.total_supply });
        }
        Ok(())
    }
}

fn credit(balance: u64, amount: u64) -> Result<u64, Violation> {
    balance
        .checked_add(amount)
        .ok_or(Violation::BalanceOverflow { balance, credit: amount })
}
