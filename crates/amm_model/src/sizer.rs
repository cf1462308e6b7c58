//! Closed-form swap sizing for a campaign fee
//!
//! A campaign brings `fee` stable tokens. Part of it is swapped into the pool
//! (freeing reward tokens) and the rest is added as liquidity matched with
//! reward tokens at the post-swap ratio.
//!
//! Without fees, swapping s_min = √(S·(S+F)) − S leaves the reward reserve
//! exactly where it started once the remainder is deposited: everything
//! the swap frees goes back in as matched liquidity. Any surplus on top of
//! s_min frees more than the deposit needs, and that excess is what the
//! campaign can emit.

use crate::{fixed, math, AmmError, FeeRate};

/// Result of sizing a campaign swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    /// Stable tokens swapped into the pool
    pub swap_amount: u64,

    /// Reward tokens freed by the swap
    pub reward_freed: u64,

    /// Reward tokens required to pair with the remaining stable tokens
    pub matched_reward_needed: u64,

    /// Swap that keeps the reward reserve unchanged (before surplus)
    pub min_swap: u64,
}

impl SwapPlan {
    /// Stable tokens left for the liquidity deposit
    #[inline]
    pub fn stable_remainder(&self, campaign_fee: u64) -> u64 {
        campaign_fee - self.swap_amount
    }

    /// Reward tokens freed beyond what the deposit needs (negative if short)
    #[inline]
    pub fn excess_reward(&self) -> i128 {
        self.reward_freed as i128 - self.matched_reward_needed as i128
    }
}

/// Ratio-preserving minimum swap: round(√(S·(S+F))) − S
pub fn min_swap(campaign_fee: u64, reserve_stable: u64) -> Result<u64, AmmError> {
    let s = reserve_stable as u128;
    let grown = s.checked_add(campaign_fee as u128).ok_or(AmmError::Overflow)?;
    let product = s.checked_mul(grown).ok_or(AmmError::Overflow)?;

    // √(S·(S+F)) >= S, so this cannot underflow
    let root = fixed::sqrt_round(product);
    Ok((root - s) as u64)
}

/// Size the swap for a campaign fee
///
/// # Arguments
/// * `campaign_fee` - Stable tokens contributed by the campaign
/// * `reserve_stable` - Current stable reserve
/// * `reserve_reward` - Current reward reserve
/// * `surplus_bps` - Extra swap as a fraction of the fee, over `fee.scale`
/// * `fee` - Pool swap fee
///
/// # Returns
/// * `SwapPlan` with the swap amount, reward freed and matched reward needed
/// * `AmmError::InvalidReserves` on an empty stable side
pub fn size_swap(
    campaign_fee: u64,
    reserve_stable: u64,
    reserve_reward: u64,
    surplus_bps: u32,
    fee: FeeRate,
) -> Result<SwapPlan, AmmError> {
    if surplus_bps > fee.scale {
        return Err(AmmError::InvalidAmount);
    }

    let s_min = min_swap(campaign_fee, reserve_stable)?;
    let surplus = fixed::mul_div_floor(campaign_fee as u128, surplus_bps as u128, fee.scale as u128)? as u64;
    let swap_amount = s_min.saturating_add(surplus).min(campaign_fee);

    let reward_freed = math::swap_out(swap_amount, reserve_stable, reserve_reward, fee)?;

    // Match the remainder at the post-swap price, rounding in the pool's favour
    let remainder = (campaign_fee - swap_amount) as u128;
    let stable_after = reserve_stable as u128 + swap_amount as u128;
    if stable_after == 0 {
        return Err(AmmError::InvalidReserves);
    }
    let reward_after = (reserve_reward - reward_freed) as u128;
    let matched = fixed::mul_div_ceil(remainder, reward_after, stable_after)?;
    if matched > u64::MAX as u128 {
        return Err(AmmError::Overflow);
    }

    Ok(SwapPlan {
        swap_amount,
        reward_freed,
        matched_reward_needed: matched as u64,
        min_swap: s_min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNIT;

    #[test]
    fn test_min_swap_closed_form() {
        // √(250·350) = 295.80, so s_min ≈ 45.80 tokens
        let s_min = min_swap(100 * UNIT, 250 * UNIT).unwrap();
        assert_eq!(s_min, 458_039_892);
    }

    #[test]
    fn test_canonical_first_campaign() {
        // 250k reward / 250 stable pool, 100 stable fee, 3 bps surplus
        let plan = size_swap(100 * UNIT, 250 * UNIT, 250_000 * UNIT, 3, FeeRate::DEFAULT).unwrap();

        assert_eq!(plan.min_swap, 458_039_892);
        assert_eq!(plan.swap_amount, 458_339_892);
        assert_eq!(plan.reward_freed, 386_346_212_908);
        assert_eq!(plan.matched_reward_needed, 387_001_487_452);
        assert!(plan.excess_reward() < 0);
    }

    #[test]
    fn test_balanced_pool() {
        let r = 250_000 * UNIT;
        let plan = size_swap(100 * UNIT, r, r, 3, FeeRate::DEFAULT).unwrap();

        assert_eq!(plan.swap_amount, 500_250_010);
        assert_eq!(plan.reward_freed, 498_649_778);
        assert_eq!(plan.matched_reward_needed, 499_550_350);
    }

    #[test]
    fn test_full_surplus_swaps_whole_fee() {
        let r = 1_000 * UNIT;
        let plan = size_swap(10 * UNIT, r, r, 10_000, FeeRate::DEFAULT).unwrap();

        assert_eq!(plan.swap_amount, 10 * UNIT);
        assert_eq!(plan.stable_remainder(10 * UNIT), 0);
        assert_eq!(plan.matched_reward_needed, 0);
        assert!(plan.excess_reward() > 0);
    }

    #[test]
    fn test_surplus_frees_more() {
        let r = 1_000 * UNIT;
        let low = size_swap(10 * UNIT, r, r, 0, FeeRate::DEFAULT).unwrap();
        let high = size_swap(10 * UNIT, r, r, 2_000, FeeRate::DEFAULT).unwrap();

        assert!(high.swap_amount > low.swap_amount);
        assert!(high.excess_reward() > low.excess_reward());
    }

    #[test]
    fn test_zero_fee_campaign() {
        let plan = size_swap(0, 100 * UNIT, 100 * UNIT, 500, FeeRate::DEFAULT).unwrap();
        assert_eq!(plan, SwapPlan { swap_amount: 0, reward_freed: 0, matched_reward_needed: 0, min_swap: 0 });
    }

    #[test]
    fn test_micro_unit_pool() {
        // S·(S+F) = 2: the smallest product with a non-square root
        let plan = size_swap(1, 1, 1_000, 0, FeeRate::DEFAULT).unwrap();
        assert_eq!(plan.min_swap, 0);
        assert_eq!(plan.swap_amount, 0);
        assert_eq!(plan.matched_reward_needed, 1_000);
    }

    #[test]
    fn test_empty_stable_side() {
        assert_eq!(
            size_swap(0, 0, 100 * UNIT, 0, FeeRate::DEFAULT),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn test_surplus_out_of_range() {
        assert_eq!(
            size_swap(UNIT, UNIT, UNIT, 10_001, FeeRate::DEFAULT),
            Err(AmmError::InvalidAmount)
        );
    }
}
