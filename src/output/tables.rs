//! Terminal summary tables.

use crate::comparison::{DriftReport, TransitionKind};
use crate::core::Tier;
use crate::pipeline::Snapshot;
use crate::scoring::SensitivityRow;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

fn base_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(Cell::new));
    table
}

fn number(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn score(value: Option<f64>) -> Cell {
    let text = value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into());
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn tier_summary_table(snapshot: &Snapshot) -> Table {
    let counts = snapshot.tier_counts();
    let mut table = base_table(&["Tier", "Families"]);
    for tier in Tier::ALL {
        table.add_row(vec![Cell::new(tier.label()), number(counts.get(tier))]);
    }
    table.add_row(vec![
        Cell::new("untiered"),
        number(snapshot.len() - counts.total()),
    ]);
    table.add_row(vec![Cell::new("VB eligible"), number(snapshot.eligible_count())]);
    table.add_row(vec![Cell::new("Unmapped"), number(snapshot.unmapped_count())]);
    table
}

/// The `limit` best-scoring families, highest fit index first.
pub fn top_families_table(snapshot: &Snapshot, limit: usize) -> Table {
    let mut ranked: Vec<_> = snapshot.families.iter().collect();
    ranked.sort_by(|a, b| {
        let a = a.score.fit_index.unwrap_or(f64::NEG_INFINITY);
        let b = b.score.fit_index.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let mut table = base_table(&["Family", "Title", "Fit", "Tier", "VB", "Mission"]);
    for assessed in ranked.into_iter().take(limit) {
        table.add_row(vec![
            Cell::new(assessed.key()),
            Cell::new(&assessed.family.title),
            score(assessed.score.fit_index),
            Cell::new(assessed.tier().map(|t| t.label()).unwrap_or("-")),
            Cell::new(if assessed.flags.vb_eligible { "yes" } else { "no" }),
            Cell::new(&assessed.mapping.primary_mission),
        ]);
    }
    table
}

pub fn drift_table(report: &DriftReport) -> Table {
    let mut table = base_table(&["Transition", "Families"]);
    for kind in TransitionKind::ALL {
        table.add_row(vec![
            Cell::new(kind.as_str()),
            number(report.transitions(kind).len()),
        ]);
    }
    table
}

pub fn sensitivity_table(rows: &[SensitivityRow]) -> Table {
    let mut table = base_table(&["Weight", "Delta", "A", "B", "C"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.weight.as_str()),
            Cell::new(format!("{:+.0}%", row.delta * 100.0)).set_alignment(CellAlignment::Right),
            number(row.a_count),
            number(row.b_count),
            number(row.c_count),
        ]);
    }
    table
}
