//! Fixed-point helpers over micro-units
//!
//! The rounding direction of each helper is part of its contract: callers
//! pick floor, ceiling or nearest to keep token conservation exact.

use crate::{AmmError, UNIT};

/// Scale a whole-token amount to micro-units
#[inline]
pub fn units(whole: u64) -> Result<u64, AmmError> {
    whole.checked_mul(UNIT).ok_or(AmmError::Overflow)
}

/// Round a non-negative float to the nearest integer micro-unit
///
/// Negative and NaN inputs collapse to zero.
#[inline]
pub fn round_f64(x: f64) -> Result<u64, AmmError> {
    if !(x > 0.0) {
        return Ok(0);
    }
    // no_std: f64::round lives in std, so add one half and truncate
    let r = x + 0.5;
    if r >= u64::MAX as f64 {
        return Err(AmmError::Overflow);
    }
    Ok(r as u64)
}

/// floor(a * b / d)
#[inline]
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::InvalidAmount);
    }
    let n = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    Ok(n / d)
}

/// ceil(a * b / d)
#[inline]
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::InvalidAmount);
    }
    let n = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    Ok(n.div_ceil(d))
}

/// round(a * b / d), ties rounded up
#[inline]
pub fn mul_div_round(a: u128, b: u128, d: u128) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::InvalidAmount);
    }
    let n = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    let q = n / d;
    let r = n % d;
    // r >= d/2 without overflowing 2*r
    if r >= d - r {
        Ok(q + 1)
    } else {
        Ok(q)
    }
}

/// Integer square root using Newton's method. Returns floor(√n).
pub fn isqrt(n: u128) -> u128 {
    // Newton needs a start strictly above the root; n/2 + 1 is not for n < 4
    if n < 4 {
        return if n == 0 { 0 } else { 1 };
    }
    let mut x = n;
    // n/2 + 1 instead of (n+1)/2 avoids overflow at u128::MAX
    let mut y = n / 2 + 1;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Square root rounded to the nearest integer.
///
/// With r = floor(√n), √n rounds up exactly when n > r² + r, since
/// (r + ½)² = r² + r + ¼ and n is an integer.
pub fn sqrt_round(n: u128) -> u128 {
    let r = isqrt(n);
    if n - r * r > r {
        r + 1
    } else {
        r
    }
}
