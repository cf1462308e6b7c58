//! Protocol configuration
//!
//! Amounts are whole tokens; the engine scales them to micro-units once at
//! construction. Every field has a default so a TOML file only needs to name
//! what it changes.

use amm_model::{units, FeeRate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolConfig {
    /// Fixed reward token supply
    pub total_supply: u64,

    /// Reward tokens seeded into the pool
    pub initial_pool_reward: u64,

    /// Stable tokens seeded into the pool
    pub initial_pool_stable: u64,

    /// Fee of campaign 1, fixed so the run starts from a known pool
    pub seed_deposit: u64,

    /// Fat-tail deposit range
    pub outer_min: u64,
    pub outer_max: u64,

    /// Typical deposit range
    pub typical_min: u64,
    pub typical_max: u64,

    /// Chance a deposit is drawn from the typical range.
    /// Empirical tuning constant; recalibrate against observed campaigns.
    pub typical_probability: f64,

    /// Late-run deposit boost is `1 + t^progress_exponent`
    pub progress_exponent: f64,

    /// Surplus is `max_bps · c · c^surplus_exponent` for circulating fraction c.
    /// Empirical tuning constant, not a derived law.
    pub surplus_exponent: f64,

    /// Share of the liquidation ceiling the treasury emits
    pub reward_share_bps: u32,

    /// Percentage of the previous campaign's emission sold back
    pub sell_back_pct: u32,

    /// Pool swap fee
    pub fee_bps: u32,

    /// Basis point scale
    pub max_bps: u32,

    /// Safety factor applied to the liquidation ceiling
    pub ceiling_buffer_bps: u32,

    /// Number of campaigns to run
    pub campaigns: u64,

    /// Emit a record every N campaigns
    pub sample_every: u64,

    /// Deposit generator seed; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            total_supply: 10_000_000,
            initial_pool_reward: 250_000,
            initial_pool_stable: 250_000,
            seed_deposit: 100,
            outer_min: 25,
            outer_max: 2_500,
            typical_min: 10,
            typical_max: 500,
            typical_probability: 0.99,
            progress_exponent: 2.5,
            surplus_exponent: 1.2,
            reward_share_bps: 8_000,
            sell_back_pct: 80,
            fee_bps: 30,
            max_bps: 10_000,
            ceiling_buffer_bps: 9_990,
            campaigns: 25_000,
            sample_every: 100,
            seed: None,
        }
    }
}

impl ProtocolConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_supply == 0 {
            return Err(ConfigError::ZeroSupply);
        }
        if self.initial_pool_reward == 0 || self.initial_pool_stable == 0 {
            return Err(ConfigError::DegeneratePool {
                reward: self.initial_pool_reward,
                stable: self.initial_pool_stable,
            });
        }
        if self.initial_pool_reward > self.total_supply {
            return Err(ConfigError::PoolExceedsSupply {
                pool: self.initial_pool_reward,
                supply: self.total_supply,
            });
        }
        if self.campaigns == 0 {
            return Err(ConfigError::NoCampaigns);
        }
        if self.sample_every == 0 {
            return Err(ConfigError::ZeroSamplingInterval);
        }

        check_bounds("outer deposit", self.outer_min, self.outer_max)?;
        check_bounds("typical deposit", self.typical_min, self.typical_max)?;

        if !(0.0..=1.0).contains(&self.typical_probability) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "typical_probability",
                value: self.typical_probability,
            });
        }
        check_exponent("progress_exponent", self.progress_exponent)?;
        check_exponent("surplus_exponent", self.surplus_exponent)?;

        if self.max_bps == 0 {
            return Err(ConfigError::ZeroBpsScale);
        }
        if self.fee_bps >= self.max_bps {
            return Err(ConfigError::BpsOutOfRange {
                name: "fee_bps",
                value: self.fee_bps,
                scale: self.max_bps,
            });
        }
        check_bps("reward_share_bps", self.reward_share_bps, self.max_bps)?;
        check_bps("ceiling_buffer_bps", self.ceiling_buffer_bps, self.max_bps)?;

        if self.sell_back_pct > 100 {
            return Err(ConfigError::SellBackOutOfRange(self.sell_back_pct));
        }

        for (name, v) in [
            ("total_supply", self.total_supply),
            ("initial_pool_stable", self.initial_pool_stable),
            ("seed_deposit", self.seed_deposit),
            ("outer_max", self.outer_max),
        ] {
            units(v).map_err(|_| ConfigError::Overflow(name))?;
        }

        Ok(())
    }

    pub fn fee_rate(&self) -> FeeRate {
        FeeRate { bps: self.fee_bps, scale: self.max_bps }
    }
}

fn check_bounds(name: &'static str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds { name, min, max });
    }
    Ok(())
}

fn check_exponent(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::BadExponent { name, value });
    }
    Ok(())
}

fn check_bps(name: &'static str, value: u32, scale: u32) -> Result<(), ConfigError> {
    if value > scale {
        return Err(ConfigError::BpsOutOfRange { name, value, scale });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fee_rate(), FeeRate::DEFAULT);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ProtocolConfig::from_toml_str(
            r#"
            campaigns = 500
            initial_pool_stable = 250
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.campaigns, 500);
        assert_eq!(config.initial_pool_stable, 250);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.total_supply, 10_000_000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ProtocolConfig::from_toml_str("campaign_count = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ProtocolConfig { seed: Some(9), ..Default::default() };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ProtocolConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_fatal_configs() {
        let zero_pool = ProtocolConfig { initial_pool_stable: 0, ..Default::default() };
        assert!(matches!(zero_pool.validate(), Err(ConfigError::DegeneratePool { .. })));

        let no_supply = ProtocolConfig { total_supply: 0, ..Default::default() };
        assert_eq!(no_supply.validate(), Err(ConfigError::ZeroSupply));

        let no_campaigns = ProtocolConfig { campaigns: 0, ..Default::default() };
        assert_eq!(no_campaigns.validate(), Err(ConfigError::NoCampaigns));

        let oversized = ProtocolConfig { initial_pool_reward: 20_000_000, ..Default::default() };
        assert!(matches!(oversized.validate(), Err(ConfigError::PoolExceedsSupply { .. })));
    }

    #[test]
    fn test_policy_bounds() {
        let inverted = ProtocolConfig { typical_min: 600, ..Default::default() };
        assert!(matches!(inverted.validate(), Err(ConfigError::InvertedBounds { .. })));

        let fee = ProtocolConfig { fee_bps: 10_000, ..Default::default() };
        assert!(matches!(fee.validate(), Err(ConfigError::BpsOutOfRange { name: "fee_bps", .. })));

        let sell = ProtocolConfig { sell_back_pct: 101, ..Default::default() };
        assert_eq!(sell.validate(), Err(ConfigError::SellBackOutOfRange(101)));

        let prob = ProtocolConfig { typical_probability: 1.5, ..Default::default() };
        assert!(matches!(prob.validate(), Err(ConfigError::ProbabilityOutOfRange { .. })));

        let exp = ProtocolConfig { surplus_exponent: f64::NAN, ..Default::default() };
        assert!(matches!(exp.validate(), Err(ConfigError::BadExponent { .. })));
    }
}
