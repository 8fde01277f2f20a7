//! Drift detection between the current and the previous period.
//!
//! Families are matched on `family_key`. Tier transitions follow a fixed,
//! asymmetric rule set: reaching A is an upgrade from anything else, while a
//! downgrade is leaving A or falling from B to C. A family that moves C to B
//! is therefore neither. Losing eligibility is tracked on its own and may
//! co-occur with a tier transition.

use crate::core::Tier;
use crate::eligibility::ExclusionReason;
use crate::pipeline::{AssessedFamily, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, info_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    New,
    Dropped,
    Upgraded,
    Downgraded,
    ExcludedByRule,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 5] = [
        TransitionKind::New,
        TransitionKind::Dropped,
        TransitionKind::Upgraded,
        TransitionKind::Downgraded,
        TransitionKind::ExcludedByRule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::New => "NEW",
            TransitionKind::Dropped => "DROPPED",
            TransitionKind::Upgraded => "UPGRADED",
            TransitionKind::Downgraded => "DOWNGRADED",
            TransitionKind::ExcludedByRule => "EXCLUDED_BY_RULE",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values of one family that drift classification looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    pub tier: Option<Tier>,
    pub fit_index: Option<f64>,
    pub vb_eligible: bool,
    pub exclusion_reason: Option<ExclusionReason>,
}

impl From<&AssessedFamily> for TransitionState {
    fn from(assessed: &AssessedFamily) -> Self {
        Self {
            tier: assessed.score.tier,
            fit_index: assessed.score.fit_index,
            vb_eligible: assessed.flags.vb_eligible,
            exclusion_reason: assessed.flags.exclusion_reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub kind: TransitionKind,
    pub family_key: String,
    pub title: String,
    /// State in the previous period; `None` for NEW
    pub before: Option<TransitionState>,
    /// State in the current period; `None` for DROPPED
    pub after: Option<TransitionState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub new: usize,
    pub dropped: usize,
    pub upgraded: usize,
    pub downgraded: usize,
    pub excluded_by_rule: usize,
}

/// The five transition lists for one pair of periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub current_period: String,
    pub previous_period: Option<String>,
    #[serde(rename = "NEW")]
    pub new: Vec<TransitionRecord>,
    #[serde(rename = "DROPPED")]
    pub dropped: Vec<TransitionRecord>,
    #[serde(rename = "UPGRADED")]
    pub upgraded: Vec<TransitionRecord>,
    #[serde(rename = "DOWNGRADED")]
    pub downgraded: Vec<TransitionRecord>,
    #[serde(rename = "EXCLUDED_BY_RULE")]
    pub excluded_by_rule: Vec<TransitionRecord>,
}

impl DriftReport {
    pub fn transitions(&self, kind: TransitionKind) -> &[TransitionRecord] {
        match kind {
            TransitionKind::New => &self.new,
            TransitionKind::Dropped => &self.dropped,
            TransitionKind::Upgraded => &self.upgraded,
            TransitionKind::Downgraded => &self.downgraded,
            TransitionKind::ExcludedByRule => &self.excluded_by_rule,
        }
    }

    pub fn summary(&self) -> DriftSummary {
        DriftSummary {
            new: self.new.len(),
            dropped: self.dropped.len(),
            upgraded: self.upgraded.len(),
            downgraded: self.downgraded.len(),
            excluded_by_rule: self.excluded_by_rule.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        TransitionKind::ALL
            .iter()
            .all(|kind| self.transitions(*kind).is_empty())
    }
}

/// Anything that was not A and now is.
pub fn is_upgrade(previous: Option<Tier>, current: Option<Tier>) -> bool {
    previous != Some(Tier::A) && current == Some(Tier::A)
}

/// Leaving A, or falling from B to C. C to nothing is not a downgrade.
pub fn is_downgrade(previous: Option<Tier>, current: Option<Tier>) -> bool {
    (previous == Some(Tier::A) && current != Some(Tier::A))
        || (previous == Some(Tier::B) && current == Some(Tier::C))
}

fn index_by_key(snapshot: &Snapshot) -> HashMap<&str, &AssessedFamily> {
    let mut index = HashMap::with_capacity(snapshot.families.len());
    for assessed in &snapshot.families {
        index.entry(assessed.key()).or_insert(assessed);
    }
    index
}

fn record(
    kind: TransitionKind,
    key: &str,
    title: &str,
    before: Option<&AssessedFamily>,
    after: Option<&AssessedFamily>,
) -> TransitionRecord {
    TransitionRecord {
        kind,
        family_key: key.to_string(),
        title: title.to_string(),
        before: before.map(TransitionState::from),
        after: after.map(TransitionState::from),
    }
}

/// Diff the current snapshot against the previous one.
///
/// An absent or empty previous snapshot is not an error: every current family
/// is NEW and the other lists are empty. Lists follow current-snapshot order,
/// except DROPPED which follows previous-snapshot order.
pub fn detect_drift(current: &Snapshot, previous: Option<&Snapshot>) -> DriftReport {
    let _span = info_span!("drift", period = %current.period).entered();

    let mut report = DriftReport {
        current_period: current.period.clone(),
        previous_period: previous.map(|p| p.period.clone()),
        ..DriftReport::default()
    };

    let previous_index = previous.map(index_by_key).unwrap_or_default();
    let current_index = index_by_key(current);

    for after in &current.families {
        let key = after.key();
        let title = after.family.title.as_str();
        let Some(before) = previous_index.get(key).copied() else {
            report
                .new
                .push(record(TransitionKind::New, key, title, None, Some(after)));
            continue;
        };

        let (was, now) = (before.score.tier, after.score.tier);
        if is_upgrade(was, now) {
            report.upgraded.push(record(
                TransitionKind::Upgraded,
                key,
                title,
                Some(before),
                Some(after),
            ));
        } else if is_downgrade(was, now) {
            report.downgraded.push(record(
                TransitionKind::Downgraded,
                key,
                title,
                Some(before),
                Some(after),
            ));
        }

        if before.flags.vb_eligible && !after.flags.vb_eligible {
            report.excluded_by_rule.push(record(
                TransitionKind::ExcludedByRule,
                key,
                title,
                Some(before),
                Some(after),
            ));
        }
    }

    if let Some(previous) = previous {
        report.dropped = previous
            .families
            .iter()
            .filter(|before| !current_index.contains_key(before.key()))
            .map(|before| {
                record(
                    TransitionKind::Dropped,
                    before.key(),
                    &before.family.title,
                    Some(before),
                    None,
                )
            })
            .collect();
    }

    let summary = report.summary();
    info!(
        new = summary.new,
        dropped = summary.dropped,
        upgraded = summary.upgraded,
        downgraded = summary.downgraded,
        excluded_by_rule = summary.excluded_by_rule,
        "Drift detected"
    );
    report
}
