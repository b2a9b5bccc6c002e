#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Balance report summarising a generated level.

mod metrics;

use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{Placement, SelectionStrategy, TileId, ZoneError};
use balanced_zones_level::Ledger;
use serde::Serialize;

pub use metrics::{mean, seam_mismatches};

/// Number of commits produced by each selection strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StrategyCounts {
    /// Corner candidate sets.
    pub corner_set: usize,
    /// Fixed boundary tiles.
    pub boundary_tile: usize,
    /// Exact edge matches.
    pub exact_match: usize,
    /// Partial edge matches.
    pub partial_match: usize,
    /// Whitelist overrides.
    pub whitelist: usize,
    /// Cells without placed neighbours.
    pub unconstrained: usize,
}

impl StrategyCounts {
    fn record(&mut self, strategy: SelectionStrategy) {
        let slot = match strategy {
            SelectionStrategy::CornerSet => &mut self.corner_set,
            SelectionStrategy::BoundaryTile => &mut self.boundary_tile,
            SelectionStrategy::ExactMatch => &mut self.exact_match,
            SelectionStrategy::PartialMatch => &mut self.partial_match,
            SelectionStrategy::Whitelist => &mut self.whitelist,
            SelectionStrategy::Unconstrained => &mut self.unconstrained,
        };
        *slot += 1;
    }
}

/// How often a tile appears in a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileUsage {
    /// Tile identifier.
    pub tile: TileId,
    /// Asset name of the tile.
    pub asset: String,
    /// Number of cells holding the tile.
    pub count: usize,
}

/// Aggregated balance metrics for one generated level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceReport {
    /// Committed zones.
    pub zone_count: usize,
    /// Corner cells.
    pub corner_count: usize,
    /// Non-corner cells on the outermost ring.
    pub boundary_count: usize,
    /// Interior cells.
    pub interior_count: usize,
    /// Commits per selection strategy.
    pub strategies: StrategyCounts,
    /// Mean defensiveness over all zones.
    pub mean_defensiveness: f32,
    /// Mean flanking over all zones.
    pub mean_flanking: f32,
    /// Mean tile dispersion over all zones.
    pub mean_dispersion: f32,
    /// Shared edges whose colours disagree.
    pub seam_mismatches: usize,
    /// Tiles in use, ordered by identifier.
    pub tile_usage: Vec<TileUsage>,
}

impl BalanceReport {
    /// Summarises the zones committed to `zones`.
    pub fn compute(zones: &Ledger, catalog: &ZoneCatalog) -> Result<Self, ZoneError> {
        let mut strategies = StrategyCounts::default();
        let mut corner_count = 0;
        let mut boundary_count = 0;
        let mut interior_count = 0;
        let mut usage = vec![0_usize; catalog.len()];
        let mut dispersions = Vec::with_capacity(zones.len());

        for zone in zones {
            match zone.placement {
                Placement::Corner(_) => corner_count += 1,
                Placement::Boundary(_) => boundary_count += 1,
                Placement::Interior => interior_count += 1,
            }
            strategies.record(zone.strategy);
            dispersions.push(catalog.lookup(zone.tile)?.dispersion());
            if let Some(slot) = usage.get_mut(zone.tile.index()) {
                *slot += 1;
            }
        }

        let tile_usage = catalog
            .ids()
            .zip(usage)
            .filter(|(_, count)| *count > 0)
            .map(|(tile, count)| TileUsage {
                tile,
                asset: tile.asset_name(),
                count,
            })
            .collect();

        Ok(Self {
            zone_count: zones.len(),
            corner_count,
            boundary_count,
            interior_count,
            strategies,
            mean_defensiveness: mean(zones.iter().map(|zone| zone.coefficients.defensiveness)),
            mean_flanking: mean(zones.iter().map(|zone| zone.coefficients.flanking)),
            mean_dispersion: mean(dispersions),
            seam_mismatches: seam_mismatches(zones, catalog)?,
            tile_usage,
        })
    }
}
