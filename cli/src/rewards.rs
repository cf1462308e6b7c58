//! Reward split across ranked campaign participants

use anyhow::Result;
use campaign_model::distribution::{self, Distribution, Participant};
use campaign_model::format_units;
use colored::Colorize;

use crate::config::parse_amount;

/// Participants ranked by their position in `deposits` (1-based)
pub fn ranked(deposits: &[u64]) -> Vec<Participant> {
    deposits
        .iter()
        .zip(1u32..)
        .map(|(&deposit, rank)| Participant { rank, deposit })
        .collect()
}

pub fn distribute(emission: &str, deposits: &[String], target: &str, gamma: u32) -> Result<()> {
    let emission = parse_amount(emission)?;
    let target = parse_amount(target)?;
    if target == 0 {
        anyhow::bail!("Target must be positive");
    }
    let deposits = deposits
        .iter()
        .map(|d| parse_amount(d))
        .collect::<Result<Vec<_>>>()?;

    let participants = ranked(&deposits);
    let Distribution { payouts, dust } = distribution::distribute(emission, &participants, target, gamma);
    log::debug!("{} participants, dust {}", participants.len(), dust);

    println!("{}", "=== Reward Distribution ===".bright_green().bold());
    println!("{} {}", "Emission:".bright_cyan(), format_units(emission, 7));
    println!("{} {}", "Target:".bright_cyan(), format_units(target, 7));
    println!("{} {}", "Gamma:".bright_cyan(), gamma);

    println!("\n{}", "=== Payouts ===".bright_yellow());
    println!("{}", format!("{:>6} {:>18} {:>18}", "Rank", "Deposit", "Payout").bold());
    for (p, payout) in participants.iter().zip(&payouts) {
        println!(
            "{:>6} {:>18} {:>18}",
            p.rank,
            format_units(p.deposit, 7),
            format_units(*payout, 7)
        );
    }
    println!("{} {}", "Undistributed:".bright_cyan(), format_units(dust, 7).dimmed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_positions() {
        let participants = ranked(&[5, 0, 9]);
        let ranks: Vec<u32> = participants.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(participants[2].deposit, 9);
    }

    #[test]
    fn test_distribute_rejects_bad_input() {
        let deposits = vec!["10".to_string(), "abc".to_string()];
        assert!(distribute("100", &deposits, "10", 1).is_err());
        assert!(distribute("100", &["1".to_string()], "0", 1).is_err());
    }
}
