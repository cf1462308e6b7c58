//! Splitting a campaign's emission across participants
//!
//! Weights are fixed-point with a 10_000 scale. A participant's score is
//! its rank weight (earlier ranks weigh more) times its contribution weight
//! (deposit relative to the campaign target, capped at 1).

use serde::Serialize;

/// Fixed-point scale of all weights
pub const WEIGHT_SCALE: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    /// 1-based rank; rank 0 scores nothing
    pub rank: u32,
    /// Deposit in micro-units
    pub deposit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// Payout per participant, same order as the input
    pub payouts: Vec<u64>,
    /// Rounding remainder left undistributed
    pub dust: u64,
}

/// 10_000 · 10_000 / rank^gamma
pub fn rank_weight(rank: u32, gamma: u32) -> u128 {
    if rank == 0 {
        return 0;
    }
    let rank_pow = (rank as u128).checked_pow(gamma).unwrap_or(u128::MAX);
    WEIGHT_SCALE * WEIGHT_SCALE / rank_pow
}

/// min(10_000, deposit · 10_000 / target)
pub fn contribution_weight(deposit: u64, target: u64) -> u128 {
    if deposit == 0 || target == 0 {
        return 0;
    }
    (deposit as u128 * WEIGHT_SCALE / target as u128).min(WEIGHT_SCALE)
}

pub fn score(rank_weight: u128, contribution_weight: u128) -> u128 {
    rank_weight * contribution_weight / WEIGHT_SCALE
}

/// Pro-rata split of `emission` by score, rounding each payout down
pub fn distribute(emission: u64, participants: &[Participant], target: u64, gamma: u32) -> Distribution {
    let scores: Vec<u128> = participants
        .iter()
        .map(|p| score(rank_weight(p.rank, gamma), contribution_weight(p.deposit, target)))
        .collect();
    let total: u128 = scores.iter().sum();

    if total == 0 {
        return Distribution { payouts: vec![0; participants.len()], dust: emission };
    }

    // Each share is at most `emission`, so the cast cannot truncate
    let payouts: Vec<u64> = scores
        .iter()
        .map(|s| (emission as u128 * s / total) as u64)
        .collect();
    let paid: u64 = payouts.iter().sum();

    Distribution { payouts, dust: emission - paid }
}
