use crate::error::{ConfigurationError, Result};
use crate::models::DustingThresholds;
use std::fs;
use std::path::Path;

pub const MAX_DUST_VALUE_NATIVE: f64 = 0.001;
pub const MAX_DUST_VALUE_USD: f64 = 0.05;
pub const MIN_CAMPAIGN_TARGETS: usize = 10;
pub const MAX_CLUSTER_GAP_HOURS: f64 = 48.0;

/// Above this many unique targets a campaign gets the weighted category split.
pub const CATEGORY_SPLIT_MIN_TARGETS: usize = 100;

/// Percent of unique targets per category; `Regular` takes whatever is left.
pub const EXCHANGE_PERCENT: usize = 22;
pub const DEFI_PERCENT: usize = 16;
pub const NFT_PERCENT: usize = 38;
pub const WHALE_PERCENT: usize = 4;

impl Default for DustingThresholds {
    fn default() -> Self {
        DustingThresholds {
            max_dust_value_native: MAX_DUST_VALUE_NATIVE,
            max_dust_value_usd: MAX_DUST_VALUE_USD,
            min_campaign_targets: MIN_CAMPAIGN_TARGETS,
            max_cluster_gap_hours: MAX_CLUSTER_GAP_HOURS,
        }
    }
}

impl DustingThresholds {
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let fields = [
            ("maxDustValueNative", self.max_dust_value_native),
            ("maxDustValueUsd", self.max_dust_value_usd),
            ("minCampaignTargets", self.min_campaign_targets as f64),
            ("maxClusterGapHours", self.max_cluster_gap_hours),
        ];

        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError { field, value });
            }
        }
        Ok(())
    }
}

/// Reads thresholds from a JSON file. Fields missing from the file keep their defaults.
pub fn load_thresholds<P: AsRef<Path>>(path: P) -> Result<DustingThresholds> {
    let data = fs::read_to_string(path)?;
    let thresholds = parse_thresholds(&data)?;
    Ok(thresholds)
}

pub fn parse_thresholds(json: &str) -> Result<DustingThresholds> {
    let thresholds: DustingThresholds = serde_json::from_str(json)?;
    thresholds.validate()?;
    Ok(thresholds)
}
