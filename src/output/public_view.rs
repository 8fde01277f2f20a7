//! Anonymised public aggregate: one row per (mission, domain) group.
//!
//! Nothing identifying leaves this view: no keys, titles or assignees.

use crate::core::{Tier, TierCounts};
use crate::pipeline::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicRow {
    pub primary_mission: String,
    pub primary_domain: String,
    pub families_count: usize,
    /// Share of PCT filings in the group
    pub pct_share: f64,
    pub tiers: TierCounts,
    /// Mean technology norm over families that have one
    pub avg_technology: Option<f64>,
}

#[derive(Default)]
struct GroupAccumulator {
    count: usize,
    pct: usize,
    tiers: Vec<Option<Tier>>,
    technology_sum: f64,
    technology_count: usize,
}

/// Group by (mission, domain) in sorted order.
pub fn public_view(snapshot: &Snapshot) -> Vec<PublicRow> {
    let mut groups: BTreeMap<(String, String), GroupAccumulator> = BTreeMap::new();
    for assessed in &snapshot.families {
        let group = groups
            .entry((
                assessed.mapping.primary_mission.clone(),
                assessed.mapping.primary_domain.clone(),
            ))
            .or_default();
        group.count += 1;
        group.pct += usize::from(assessed.score.pct_flag);
        group.tiers.push(assessed.score.tier);
        if let Some(norm) = assessed.score.technology_norm {
            group.technology_sum += norm;
            group.technology_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|((primary_mission, primary_domain), group)| PublicRow {
            primary_mission,
            primary_domain,
            families_count: group.count,
            pct_share: group.pct as f64 / group.count as f64,
            tiers: TierCounts::tally(group.tiers),
            avg_technology: (group.technology_count > 0)
                .then(|| group.technology_sum / group.technology_count as f64),
        })
        .collect()
}
