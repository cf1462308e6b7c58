//! One-off pool calculations: swap quotes and campaign swap sizing

use amm_model::{size_swap, swap_out, AmmError, FeeRate, SwapPlan, BPS_SCALE};
use anyhow::Result;
use campaign_model::format_units;
use colored::Colorize;

use crate::config::parse_amount;

fn fee_rate(fee_bps: u32) -> Result<FeeRate> {
    FeeRate::new(fee_bps, BPS_SCALE).map_err(|_| {
        anyhow::anyhow!("Fee must be below {} bps, got {}", BPS_SCALE, fee_bps)
    })
}

fn amm_err(what: &str) -> impl FnOnce(AmmError) -> anyhow::Error + '_ {
    move |e| anyhow::anyhow!("{} failed: {}", what, e)
}

/// Output of a swap, all in micro-units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub amount_out: u64,
    pub fee_paid: u64,
    pub price_before: f64,
    pub price_after: f64,
}

pub fn compute_quote(amount_in: u64, reserve_in: u64, reserve_out: u64, fee: FeeRate) -> Result<Quote> {
    let amount_out = swap_out(amount_in, reserve_in, reserve_out, fee).map_err(amm_err("Swap"))?;
    let fee_paid = fee.fee_on(amount_in).map_err(amm_err("Fee"))?;

    // Price of the output token in input tokens
    let price = |r_in: u64, r_out: u64| if r_out == 0 { 0.0 } else { r_in as f64 / r_out as f64 };
    Ok(Quote {
        amount_out,
        fee_paid,
        price_before: price(reserve_in, reserve_out),
        price_after: price(reserve_in.saturating_add(amount_in), reserve_out - amount_out),
    })
}

pub fn quote(amount_in: &str, reserve_in: &str, reserve_out: &str, fee_bps: u32) -> Result<()> {
    let fee = fee_rate(fee_bps)?;
    let amount_in = parse_amount(amount_in)?;
    let q = compute_quote(amount_in, parse_amount(reserve_in)?, parse_amount(reserve_out)?, fee)?;

    println!("{}", "=== Swap Quote ===".bright_green().bold());
    println!("{} {}", "Amount in:".bright_cyan(), format_units(amount_in, 7));
    println!("{} {} bps", "Fee rate:".bright_cyan(), fee_bps);
    println!("{} {}", "Fee paid:".bright_cyan(), format_units(q.fee_paid, 7));
    println!("{} {}", "Amount out:".bright_cyan(), format_units(q.amount_out, 7).bright_green());
    println!("{} {:.8}", "Price before:".bright_cyan(), q.price_before);
    println!("{} {:.8}", "Price after:".bright_cyan(), q.price_after);

    Ok(())
}

pub fn compute_plan(
    fee: u64,
    reserve_stable: u64,
    reserve_reward: u64,
    surplus_bps: u32,
    rate: FeeRate,
) -> Result<SwapPlan> {
    if surplus_bps > BPS_SCALE {
        anyhow::bail!("Surplus must be at most {} bps, got {}", BPS_SCALE, surplus_bps);
    }
    size_swap(fee, reserve_stable, reserve_reward, surplus_bps, rate).map_err(amm_err("Sizing"))
}

pub fn size(fee: &str, reserve_stable: &str, reserve_reward: &str, surplus_bps: u32, fee_bps: u32) -> Result<()> {
    let rate = fee_rate(fee_bps)?;
    let fee = parse_amount(fee)?;
    let plan = compute_plan(fee, parse_amount(reserve_stable)?, parse_amount(reserve_reward)?, surplus_bps, rate)?;

    println!("{}", "=== Swap Sizing ===".bright_green().bold());
    println!("{} {}", "Campaign fee:".bright_cyan(), format_units(fee, 7));
    println!("{} {}", "Minimum swap:".bright_cyan(), format_units(plan.min_swap, 7));
    println!("{} {}", "Swap amount:".bright_cyan(), format_units(plan.swap_amount, 7));
    println!("{} {}", "Deposit (stable):".bright_cyan(), format_units(plan.stable_remainder(fee), 7));
    println!("{} {}", "Reward freed:".bright_cyan(), format_units(plan.reward_freed, 7));
    println!("{} {}", "Matched reward:".bright_cyan(), format_units(plan.matched_reward_needed, 7));

    let excess = plan.excess_reward();
    let magnitude = format_units(excess.unsigned_abs() as u64, 7);
    if excess >= 0 {
        println!("{} {}", "Excess reward:".bright_cyan(), magnitude.bright_green());
    } else {
        println!("{} -{}", "Excess reward:".bright_cyan(), magnitude.bright_yellow());
        println!("{}", "  (deposit needs more reward than the swap frees)".dimmed());
    }

    Ok(())
}
