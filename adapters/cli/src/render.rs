use std::fmt::Write as _;

use anyhow::{Context, Result};
use balanced_zones_core::{GridPosition, PlacedZone};
use balanced_zones_system_analytics::BalanceReport;
use balanced_zones_system_generation::GeneratedLevel;
use serde::Serialize;

const COLUMN_WIDTH: usize = 11;

#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    origin: GridPosition,
    inset: f32,
    columns: u32,
    rows: u32,
    cell_size: f32,
    zones: &'a [PlacedZone],
    summary: &'a BalanceReport,
}

/// Renders the grid of asset names row by row, north row first, followed by
/// the balance summary.
pub(crate) fn text(level: &GeneratedLevel, report: &BalanceReport, seed: u64) -> String {
    let layout = level.layout();
    let mut out = String::new();
    let _ = writeln!(out, "seed: {seed}");
    let _ = writeln!(
        out,
        "grid: {} x {} cells of {} units",
        layout.columns(),
        layout.rows(),
        layout.cell_size()
    );
    let _ = writeln!(out);

    for row in 0..layout.rows() {
        let names: Vec<String> = level
            .row(row)
            .map(|zone| format!("{:<width$}", zone.tile.asset_name(), width = COLUMN_WIDTH))
            .collect();
        let _ = writeln!(out, "{}", names.join(" ").trim_end());
    }

    let strategies = &report.strategies;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "zones: {} ({} corner, {} boundary, {} interior)",
        report.zone_count, report.corner_count, report.boundary_count, report.interior_count
    );
    let _ = writeln!(
        out,
        "strategies: exact {}, partial {}, whitelist {}, unconstrained {}",
        strategies.exact_match,
        strategies.partial_match,
        strategies.whitelist,
        strategies.unconstrained
    );
    let _ = writeln!(
        out,
        "mean defensiveness: {:.3}, mean flanking: {:.3}, mean dispersion: {:.3}",
        report.mean_defensiveness, report.mean_flanking, report.mean_dispersion
    );
    let _ = writeln!(out, "seam mismatches: {}", report.seam_mismatches);
    out
}

/// Renders placements and summary as pretty-printed JSON.
pub(crate) fn json(level: &GeneratedLevel, report: &BalanceReport, seed: u64) -> Result<String> {
    let layout = level.layout();
    let output = JsonOutput {
        seed,
        origin: layout.origin(),
        inset: layout.inset(),
        columns: layout.columns(),
        rows: layout.rows(),
        cell_size: layout.cell_size(),
        zones: level.zones().zones(),
        summary: report,
    };
    serde_json::to_string_pretty(&output).context("failed to serialise level as json")
}
