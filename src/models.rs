use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    pub source_address: String,
    pub target_address: String,
    pub token: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub amount_usd: Option<f64>,
}

impl TransferRecord {
    /// Label used for grouping; the mint itself when no symbol is known.
    pub fn symbol(&self) -> &str {
        self.token_symbol.as_deref().unwrap_or(&self.token)
    }

    /// USD value when present and usable, `None` otherwise.
    pub fn usd_value(&self) -> Option<f64> {
        self.amount_usd.filter(|v| is_usable(*v))
    }

    pub fn native_value(&self) -> Option<f64> {
        Some(self.amount).filter(|v| is_usable(*v))
    }
}

/// Finite and non-negative.
pub fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DustingThresholds {
    pub max_dust_value_native: f64,
    pub max_dust_value_usd: f64,
    pub min_campaign_targets: usize,
    pub max_cluster_gap_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetCategory {
    Exchange,
    Defi,
    Nft,
    Whale,
    Regular,
}

impl TargetCategory {
    pub const ALL: [TargetCategory; 5] = [
        TargetCategory::Exchange,
        TargetCategory::Defi,
        TargetCategory::Nft,
        TargetCategory::Whale,
        TargetCategory::Regular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetCategory::Exchange => "exchange",
            TargetCategory::Defi => "defi",
            TargetCategory::Nft => "nft",
            TargetCategory::Whale => "whale",
            TargetCategory::Regular => "regular",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    pub category: TargetCategory,
    pub address_count: usize,
    pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub source_address: String,
    pub token_symbol: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub transfer_count: usize,
    pub unique_target_count: usize,
    pub total_value_usd: f64,
    pub target_groups: Vec<TargetGroup>,
}

impl Campaign {
    pub fn addresses_in(&self, category: TargetCategory) -> usize {
        self.target_groups
            .iter()
            .filter(|g| g.category == category)
            .map(|g| g.address_count)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub campaign_count: usize,
    pub transfer_count: usize,
    pub unique_target_count: usize,
    pub total_value_usd: f64,
    pub source_count: usize,
    pub addresses_by_category: BTreeMap<TargetCategory, usize>,
    pub earliest_start: Option<DateTime<Utc>>,
    pub latest_end: Option<DateTime<Utc>>,
}
