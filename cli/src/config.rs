//! Protocol config loading and whole-token amount parsing

use amm_model::UNIT;
use anyhow::{Context, Result};
use campaign_model::ProtocolConfig;
use std::fs;
use std::path::Path;

/// Decimal places representable in micro-units
const MAX_DECIMALS: usize = 7;

/// Command line values that take precedence over the config file
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub campaigns: Option<u64>,
    pub sample_every: Option<u64>,
}

/// Load the protocol config from `path` (or defaults) and apply overrides
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<ProtocolConfig> {
    let mut config = match path {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            read_config(path)?
        }
        None => ProtocolConfig::default(),
    };

    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(campaigns) = overrides.campaigns {
        config.campaigns = campaigns;
    }
    if let Some(sample_every) = overrides.sample_every {
        config.sample_every = sample_every;
    }

    config.validate().context("Invalid protocol config")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ProtocolConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found: {}\n\
             Write the defaults with: flashsim config > {}",
            path.display(),
            path.display()
        );
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    ProtocolConfig::from_toml_str(&data)
        .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

pub fn default_toml() -> Result<String> {
    ProtocolConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")
}

/// Parse a whole-token decimal string ("12", "0.5", "1_000.25") into micro-units
pub fn parse_amount(input: &str) -> Result<u64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != '_').collect();
    let (whole, frac) = match cleaned.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && frac.is_empty() {
        anyhow::bail!("Empty amount: '{}'", input);
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Invalid amount: '{}' (expected a non-negative decimal)", input);
    }
    if frac.len() > MAX_DECIMALS {
        anyhow::bail!("Too many decimals in '{}' (max {})", input, MAX_DECIMALS);
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().with_context(|| format!("Amount too large: '{}'", input))?
    };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{:0<width$}", frac, width = MAX_DECIMALS).parse()?
    };

    whole
        .checked_mul(UNIT)
        .and_then(|w| w.checked_add(frac))
        .with_context(|| format!("Amount too large: '{}'", input))
}
