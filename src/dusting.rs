use crate::{
    config::{
        CATEGORY_SPLIT_MIN_TARGETS, DEFI_PERCENT, EXCHANGE_PERCENT, NFT_PERCENT, WHALE_PERCENT,
    },
    error::{ConfigurationError, Result},
    models::{Campaign, CampaignSummary, DustingThresholds, TargetCategory, TargetGroup, TransferRecord},
    source::{collect_all, TransferSource},
};
use chrono::Duration;
use log::info;
use std::collections::{BTreeMap, BTreeSet, HashSet};

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;

/// Groups dust transfers into per-source, per-token campaigns.
///
/// Pure: no I/O, no logging, no state kept between calls. The only failure is a
/// threshold that is not positive.
pub fn detect(
    transfers: &[TransferRecord],
    thresholds: &DustingThresholds,
) -> std::result::Result<Vec<Campaign>, ConfigurationError> {
    thresholds.validate()?;

    let mut groups: BTreeMap<(&str, &str), Vec<&TransferRecord>> = BTreeMap::new();
    for tx in transfers.iter().filter(|tx| is_dust(tx, thresholds)) {
        groups
            .entry((tx.source_address.as_str(), tx.symbol()))
            .or_default()
            .push(tx);
    }

    let mut campaigns: Vec<Campaign> = Vec::new();
    for ((source, symbol), mut group) in groups {
        if group.len() < thresholds.min_campaign_targets {
            continue;
        }

        group.sort_by_key(|tx| tx.timestamp);

        for cluster in split_by_gap(&group, thresholds.max_cluster_gap_hours) {
            if cluster.len() < thresholds.min_campaign_targets {
                continue;
            }
            let id = format!("campaign-{}", campaigns.len() + 1);
            campaigns.push(build_campaign(id, source, symbol, cluster));
        }
    }

    Ok(campaigns)
}

/// USD check wins whenever a usable USD value is present.
pub fn is_dust(tx: &TransferRecord, thresholds: &DustingThresholds) -> bool {
    match (tx.usd_value(), tx.native_value()) {
        (Some(usd), _) => usd <= thresholds.max_dust_value_usd,
        (None, Some(native)) => native <= thresholds.max_dust_value_native,
        (None, None) => false,
    }
}

/// Largest gap that keeps two neighbours in one cluster, at nanosecond precision.
/// `None` when the threshold exceeds what a `Duration` can hold, so nothing splits.
pub fn max_gap(max_gap_hours: f64) -> Option<Duration> {
    let nanos = max_gap_hours * NANOS_PER_HOUR;
    if nanos >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::nanoseconds(nanos as i64))
}

/// Splits a timestamp-sorted slice wherever two neighbours are more than
/// `max_gap_hours` apart.
fn split_by_gap<'a>(
    sorted: &'a [&'a TransferRecord],
    max_gap_hours: f64,
) -> Vec<&'a [&'a TransferRecord]> {
    let mut clusters = Vec::new();
    let mut start = 0;

    if let Some(limit) = max_gap(max_gap_hours) {
        for i in 1..sorted.len() {
            if sorted[i].timestamp - sorted[i - 1].timestamp > limit {
                clusters.push(&sorted[start..i]);
                start = i;
            }
        }
    }
    if start < sorted.len() {
        clusters.push(&sorted[start..]);
    }

    clusters
}

fn build_campaign(id: String, source: &str, symbol: &str, cluster: &[&TransferRecord]) -> Campaign {
    let unique_targets: HashSet<&str> = cluster
        .iter()
        .map(|tx| tx.target_address.as_str())
        .collect();
    let total_value_usd: f64 = cluster.iter().map(|tx| tx.usd_value().unwrap_or(0.0)).sum();

    // cluster is non-empty and sorted
    let start_time = cluster[0].timestamp;
    let end_time = cluster[cluster.len() - 1].timestamp;

    Campaign {
        id,
        source_address: source.to_string(),
        token_symbol: symbol.to_string(),
        start_time,
        end_time,
        transfer_count: cluster.len(),
        unique_target_count: unique_targets.len(),
        total_value_usd,
        target_groups: categorize_targets(unique_targets.len(), total_value_usd),
    }
}

/// Stand-in for real address classification: a single `regular` bucket for small
/// campaigns, fixed percentage weights above the split threshold.
pub fn categorize_targets(unique_targets: usize, total_value_usd: f64) -> Vec<TargetGroup> {
    if unique_targets <= CATEGORY_SPLIT_MIN_TARGETS {
        return vec![TargetGroup {
            category: TargetCategory::Regular,
            address_count: unique_targets,
            value_usd: total_value_usd,
        }];
    }

    let weighted = [
        (TargetCategory::Exchange, EXCHANGE_PERCENT),
        (TargetCategory::Defi, DEFI_PERCENT),
        (TargetCategory::Nft, NFT_PERCENT),
        (TargetCategory::Whale, WHALE_PERCENT),
    ];

    let mut groups = Vec::with_capacity(weighted.len() + 1);
    let mut assigned = 0;
    for (category, percent) in weighted {
        let count = unique_targets * percent / 100;
        assigned += count;
        groups.push(TargetGroup {
            category,
            address_count: count,
            value_usd: share_of(total_value_usd, count, unique_targets),
        });
    }

    let remainder = unique_targets - assigned;
    groups.push(TargetGroup {
        category: TargetCategory::Regular,
        address_count: remainder,
        value_usd: share_of(total_value_usd, remainder, unique_targets),
    });

    groups
}

fn share_of(total: f64, count: usize, of: usize) -> f64 {
    total * (count as f64 / of as f64)
}

pub fn summarize(campaigns: &[Campaign]) -> CampaignSummary {
    let mut summary = CampaignSummary::default();
    let mut sources: BTreeSet<&str> = BTreeSet::new();

    for campaign in campaigns {
        summary.campaign_count += 1;
        summary.transfer_count += campaign.transfer_count;
        summary.unique_target_count += campaign.unique_target_count;
        summary.total_value_usd += campaign.total_value_usd;
        sources.insert(&campaign.source_address);

        for group in &campaign.target_groups {
            *summary.addresses_by_category.entry(group.category).or_insert(0) += group.address_count;
        }

        summary.earliest_start = Some(match summary.earliest_start {
            Some(t) => t.min(campaign.start_time),
            None => campaign.start_time,
        });
        summary.latest_end = Some(match summary.latest_end {
            Some(t) => t.max(campaign.end_time),
            None => campaign.end_time,
        });
    }

    summary.source_count = sources.len();
    summary
}

/// Collects from every source, then runs [`detect`] over the combined batch.
pub async fn detect_from_sources(
    sources: &[Box<dyn TransferSource>],
    thresholds: &DustingThresholds,
) -> Result<Vec<Campaign>> {
    thresholds.validate()?;

    let transfers = collect_all(sources).await?;
    info!(
        "Collected {} transfers from {} source(s)",
        transfers.len(),
        sources.len()
    );

    let campaigns = detect(&transfers, thresholds)?;
    info!(
        "Detected {} dusting campaign(s) covering {} transfers",
        campaigns.len(),
        campaigns.iter().map(|c| c.transfer_count).sum::<usize>()
    );

    Ok(campaigns)
}
