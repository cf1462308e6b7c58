//! Constant product swap math (x·y=k) with the fee taken on input

use crate::{AmmError, BPS_SCALE};

/// Proportional swap fee, `bps / scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    pub bps: u32,
    pub scale: u32,
}

impl FeeRate {
    /// 0.3% over the standard basis point scale
    pub const DEFAULT: FeeRate = FeeRate { bps: 30, scale: BPS_SCALE };

    /// Zero fee (used for analytic comparisons)
    pub const ZERO: FeeRate = FeeRate { bps: 0, scale: BPS_SCALE };

    pub fn new(bps: u32, scale: u32) -> Result<Self, AmmError> {
        if scale == 0 || bps >= scale {
            return Err(AmmError::InvalidAmount);
        }
        Ok(FeeRate { bps, scale })
    }

    /// fee = ceil(amount × bps / scale)
    #[inline]
    pub fn fee_on(&self, amount: u64) -> Result<u64, AmmError> {
        let fee = crate::mul_div_ceil(amount as u128, self.bps as u128, self.scale as u128)?;
        // bps < scale, so fee <= amount
        Ok(fee as u64)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        FeeRate::DEFAULT
    }
}

/// Output amount for swapping `amount_in` against `(reserve_in, reserve_out)`
///
/// - fee = ceil(amount_in × fee_rate)
/// - net = amount_in − fee
/// - out = floor(net × reserve_out / (reserve_in + net))
///
/// The fee rounds up and the output rounds down so the pool never pays out
/// more than the invariant allows.
///
/// # Returns
/// * `AmmError::InvalidReserves` if `reserve_in + net == 0`
pub fn swap_out(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee: FeeRate,
) -> Result<u64, AmmError> {
    let fee_amount = fee.fee_on(amount_in)?;
    // a hand-built rate with bps > scale charges more than the input
    let net = amount_in.checked_sub(fee_amount).ok_or(AmmError::InvalidAmount)? as u128;

    let denom = reserve_in as u128 + net;
    if denom == 0 {
        return Err(AmmError::InvalidReserves);
    }

    let out = crate::mul_div_floor(net, reserve_out as u128, denom)?;
    // out < reserve_out whenever reserve_in > 0
    Ok(out as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNIT;

    #[test]
    fn test_swap_small() {
        // 1,000 in against a 250k/250k pool: close to 1:1 minus fee and slippage
        let r = 250_000 * UNIT;
        let out = swap_out(1_000 * UNIT, r, r, FeeRate::DEFAULT).unwrap();

        assert!(out < 1_000 * UNIT);
        assert!(out > 990 * UNIT);
    }

    #[test]
    fn test_fee_rounds_up() {
        // 30 bps of 1 micro-unit still costs 1 micro-unit
        assert_eq!(FeeRate::DEFAULT.fee_on(1).unwrap(), 1);
        assert_eq!(FeeRate::DEFAULT.fee_on(10_000).unwrap(), 30);
        assert_eq!(FeeRate::DEFAULT.fee_on(10_001).unwrap(), 31);
        assert_eq!(swap_out(1, 1_000, 1_000, FeeRate::DEFAULT).unwrap(), 0);
    }

    #[test]
    fn test_fee_accounting() {
        let x = 1_000 * UNIT;
        let y = 60_000 * UNIT;

        let with_fee = swap_out(10 * UNIT, x, y, FeeRate::DEFAULT).unwrap();
        let no_fee = swap_out(10 * UNIT, x, y, FeeRate::ZERO).unwrap();

        assert!(with_fee < no_fee);
    }

    #[test]
    fn test_invariant_increases_with_fees() {
        let x0 = 1_000 * UNIT;
        let y0 = 60_000 * UNIT;
        let k = (x0 as u128) * (y0 as u128);

        let dx = 50 * UNIT;
        let dy = swap_out(dx, x0, y0, FeeRate::DEFAULT).unwrap();

        let x1 = (x0 + dx) as u128;
        let y1 = (y0 - dy) as u128;
        assert!(x1 * y1 > k, "Invariant should increase due to fees");
    }

    #[test]
    fn test_degenerate_pool() {
        assert_eq!(swap_out(0, 0, 1_000, FeeRate::DEFAULT), Err(AmmError::InvalidReserves));
        // Zero input against a live pool is a no-op, not an error
        assert_eq!(swap_out(0, 1_000, 1_000, FeeRate::DEFAULT).unwrap(), 0);
    }

    #[test]
    fn test_fee_rate_validation() {
        assert!(FeeRate::new(30, 10_000).is_ok());
        assert_eq!(FeeRate::new(10_000, 10_000), Err(AmmError::InvalidAmount));
        assert_eq!(FeeRate::new(0, 0), Err(AmmError::InvalidAmount));
    }

    #[test]
    fn test_unchecked_rate_rejected_by_swap() {
        let greedy = FeeRate { bps: 20_000, scale: BPS_SCALE };
        assert_eq!(swap_out(1_000, 1_000, 1_000, greedy), Err(AmmError::InvalidAmount));

        let no_scale = FeeRate { bps: 0, scale: 0 };
        assert_eq!(swap_out(1_000, 1_000, 1_000, no_scale), Err(AmmError::InvalidAmount));
    }
}
