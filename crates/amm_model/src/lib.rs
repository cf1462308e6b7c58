//! AMM Model - Pure constant product math (x·y=k) for campaign funding
//!
//! This crate contains the fixed-point helpers, the fee-on-input swap
//! formula and the closed-form swap sizer used by the campaign simulator.
//!
//! Every amount is an integer number of micro-units (see [`UNIT`]); all
//! intermediate products are computed in `u128`.

#![no_std]
#![forbid(unsafe_code)]

pub mod fixed;
pub mod math;
pub mod sizer;

use core::fmt;

pub use fixed::{isqrt, mul_div_ceil, mul_div_floor, mul_div_round, round_f64, sqrt_round, units};
pub use math::{swap_out, FeeRate};
pub use sizer::{size_swap, SwapPlan};

/// Micro-unit scaling factor (1e7)
pub const UNIT: u64 = 10_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u32 = 10_000;

/// Error types for AMM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Invalid reserves (zero, or a pool that would be emptied)
    InvalidReserves,
    /// Invalid amount or rate
    InvalidAmount,
    /// Arithmetic overflow
    Overflow,
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmmError::InvalidReserves => f.write_str("degenerate pool reserves"),
            AmmError::InvalidAmount => f.write_str("invalid amount or rate"),
            AmmError::Overflow => f.write_str("arithmetic overflow"),
        }
    }
}
