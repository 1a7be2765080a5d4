use chrono::{Duration, TimeZone, Utc};
use dust_analyzer::{
    dusting::{categorize_targets, detect, is_dust, max_gap},
    models::{DustingThresholds, TransferRecord},
};
use proptest::prelude::*;
use std::collections::HashMap;

fn thresholds(min_targets: usize, gap_hours: f64) -> DustingThresholds {
    DustingThresholds {
        max_dust_value_native: 0.001,
        max_dust_value_usd: 0.05,
        min_campaign_targets: min_targets,
        max_cluster_gap_hours: gap_hours,
    }
}

prop_compose! {
    fn arb_transfer()(
        source in 0..3usize,
        target in 0..40usize,
        symbol in prop::sample::select(vec!["SOL", "BONK"]),
        offset_secs in 0i64..(60 * 60 * 24 * 10),
        offset_nanos in 0i64..1_000_000_000,
        amount in prop_oneof![0.0f64..0.002, 0.0f64..5.0],
        amount_usd in prop::option::of(0.0f64..0.1),
        sig in 0..1000u32,
    ) -> TransferRecord {
        TransferRecord {
            signature: format!("sig{}", sig),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset_secs)
                + Duration::nanoseconds(offset_nanos),
            source_address: format!("S{}", source),
            target_address: format!("T{}", target),
            token: format!("mint-{}", symbol),
            token_symbol: Some(symbol.to_string()),
            amount,
            amount_usd,
        }
    }
}

proptest! {
    #[test]
    fn campaigns_respect_size_and_totals(
        transfers in prop::collection::vec(arb_transfer(), 0..200),
        min_targets in 1usize..15,
        gap_hours in 0.5f64..72.0,
    ) {
        let t = thresholds(min_targets, gap_hours);
        let campaigns = detect(&transfers, &t).unwrap();

        for c in &campaigns {
            prop_assert!(c.transfer_count >= min_targets);
            prop_assert!(c.start_time <= c.end_time);

            let addresses: usize = c.target_groups.iter().map(|g| g.address_count).sum();
            prop_assert_eq!(addresses, c.unique_target_count);

            let usd: f64 = c.target_groups.iter().map(|g| g.value_usd).sum();
            prop_assert!((usd - c.total_value_usd).abs() < 1e-9);
        }

        let ids: std::collections::HashSet<&str> = campaigns.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(ids.len(), campaigns.len());
    }

    #[test]
    fn detection_is_deterministic(
        transfers in prop::collection::vec(arb_transfer(), 0..150),
        min_targets in 1usize..10,
    ) {
        let t = thresholds(min_targets, 24.0);
        let first = detect(&transfers, &t).unwrap();
        let second = detect(&transfers, &t).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn dust_filter_follows_value_precedence(tx in arb_transfer()) {
        let t = thresholds(10, 48.0);
        let expected = match tx.amount_usd {
            Some(usd) => usd <= t.max_dust_value_usd,
            None => tx.amount <= t.max_dust_value_native,
        };
        prop_assert_eq!(is_dust(&tx, &t), expected);
    }

    #[test]
    fn clusters_are_separated_by_more_than_gap(
        transfers in prop::collection::vec(arb_transfer(), 0..200),
        gap_hours in 0.5f64..48.0,
    ) {
        let t = thresholds(1, gap_hours);
        let limit = max_gap(gap_hours).unwrap();

        // With a minimum of one, every dust transfer lands in exactly one campaign.
        let campaigns = detect(&transfers, &t).unwrap();
        let dust_count = transfers.iter().filter(|tx| is_dust(tx, &t)).count();
        prop_assert_eq!(campaigns.iter().map(|c| c.transfer_count).sum::<usize>(), dust_count);

        let mut by_group: HashMap<(String, String), Vec<_>> = HashMap::new();
        for c in &campaigns {
            by_group
                .entry((c.source_address.clone(), c.token_symbol.clone()))
                .or_default()
                .push((c.start_time, c.end_time));
        }

        for (_, mut spans) in by_group {
            spans.sort();
            for pair in spans.windows(2) {
                prop_assert!(pair[1].0 - pair[0].1 > limit);
            }
        }

        for tx_group in group_dust(&transfers, &t).values() {
            let mut times: Vec<_> = tx_group.iter().map(|tx| tx.timestamp).collect();
            times.sort();
            let expected_clusters = 1 + times
                .windows(2)
                .filter(|w| w[1] - w[0] > limit)
                .count();
            let key = (tx_group[0].source_address.clone(), tx_group[0].token_symbol.clone().unwrap_or_default());
            let found = campaigns
                .iter()
                .filter(|c| c.source_address == key.0 && c.token_symbol == key.1)
                .count();
            prop_assert_eq!(found, expected_clusters);
        }
    }
}

proptest! {
    #[test]
    fn weighted_split_preserves_totals(n in 101usize..5000, total in 0.0f64..1e6) {
        let groups = categorize_targets(n, total);

        prop_assert_eq!(groups.len(), 5);
        prop_assert_eq!(groups.iter().map(|g| g.address_count).sum::<usize>(), n);
        prop_assert_eq!(groups[0].address_count, n * 22 / 100);
        prop_assert_eq!(groups[2].address_count, n * 38 / 100);

        let usd: f64 = groups.iter().map(|g| g.value_usd).sum();
        prop_assert!((usd - total).abs() <= 1e-9 * total.max(1.0));
    }
}

fn group_dust<'a>(
    transfers: &'a [TransferRecord],
    t: &DustingThresholds,
) -> HashMap<(String, String), Vec<&'a TransferRecord>> {
    let mut groups: HashMap<(String, String), Vec<&TransferRecord>> = HashMap::new();
    for tx in transfers.iter().filter(|tx| is_dust(tx, t)) {
        groups
            .entry((tx.source_address.clone(), tx.symbol().to_string()))
            .or_default()
            .push(tx);
    }
    groups
}
