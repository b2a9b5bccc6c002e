#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wang-tile selection for a single grid cell.
//!
//! Corner cells draw from a fixed candidate set, boundary cells receive the
//! walled tile of their side, and interior cells match the colours exposed by
//! their West and South neighbours. Whitelisted neighbours bypass colour
//! matching altogether. Every random choice goes through one generator that is
//! seeded once when the selector is built.

mod config;
mod constraints;

use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{
    Corner, GridCell, GridPosition, PlacedZone, Placement, SelectionStrategy, Side,
    TileDefinition, TileId, ZoneError,
};
use balanced_zones_level::{GridLayout, Ledger};
use balanced_zones_system_coefficients::CoefficientEngine;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use config::{ColourDrift, DispersionPreference, SelectorConfig, TieBreak};
pub use constraints::EdgeConstraints;

/// Tile chosen for a cell together with the strategy that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Chosen tile.
    pub tile: TileId,
    /// Strategy that narrowed the candidates.
    pub strategy: SelectionStrategy,
}

/// Chooses and commits tiles cell by cell.
#[derive(Debug)]
pub struct TileSelector<R = ChaCha8Rng> {
    catalog: ZoneCatalog,
    config: SelectorConfig,
    coefficients: CoefficientEngine,
    rng: R,
}

impl TileSelector<ChaCha8Rng> {
    /// Creates a selector whose generator is seeded once from `seed`.
    #[must_use]
    pub fn new(catalog: ZoneCatalog, config: SelectorConfig, seed: u64) -> Self {
        Self::with_rng(catalog, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> TileSelector<R> {
    /// Creates a selector that draws from an injected generator.
    #[must_use]
    pub fn with_rng(catalog: ZoneCatalog, config: SelectorConfig, rng: R) -> Self {
        let coefficients = CoefficientEngine::new(config.coefficients);
        Self {
            catalog,
            config,
            coefficients,
            rng,
        }
    }

    /// Catalog the selector draws from.
    #[must_use]
    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    /// Configuration applied to every selection.
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Chooses a tile for `cell` without committing it.
    pub fn select(
        &mut self,
        cell: GridCell,
        layout: &GridLayout,
        ledger: &Ledger,
    ) -> Result<Selection, ZoneError> {
        if !layout.contains(cell) {
            let position = layout.position_of(cell);
            return Err(ZoneError::PositionOffGrid {
                x: position.x(),
                y: position.y(),
            });
        }

        match layout.classify(cell) {
            Placement::Corner(corner) => self.select_corner(cell, corner, ledger),
            Placement::Boundary(side) => Ok(Selection {
                tile: self.catalog.perimeter().boundary_tile(side),
                strategy: SelectionStrategy::BoundaryTile,
            }),
            Placement::Interior => self.select_interior(cell, ledger),
        }
    }

    /// Chooses an interior tile against caller-supplied constraints on any of
    /// the four sides.
    ///
    /// Exact matches win; otherwise the entries satisfying the most
    /// constraints are kept, provided they satisfy at least the configured
    /// threshold (capped by the number of constraints). An empty constraint
    /// set makes the whole catalog eligible.
    pub fn select_with_constraints(
        &mut self,
        cell: GridCell,
        constraints: &EdgeConstraints,
    ) -> Result<Selection, ZoneError> {
        let tiles = self.catalog.tiles();
        let (mut candidates, strategy) = if constraints.is_empty() {
            (self.catalog.ids().collect(), SelectionStrategy::Unconstrained)
        } else {
            let exact = exact_matches(tiles, constraints);
            if exact.is_empty() {
                let threshold = self
                    .config
                    .partial_match_threshold
                    .min(constraints.count());
                let partial = best_partial_matches(tiles, constraints, threshold);
                if partial.is_empty() {
                    return Err(ZoneError::NoApplicableTile { cell });
                }
                log::warn!(
                    "no exact match for cell ({}, {}); {} partial candidates remain",
                    cell.column(),
                    cell.row(),
                    partial.len()
                );
                (partial, SelectionStrategy::PartialMatch)
            } else {
                (exact, SelectionStrategy::ExactMatch)
            }
        };

        if self.config.drift.enabled {
            candidates = self.apply_drift(candidates, constraints)?;
        }

        let tile = self.break_tie(&candidates, Placement::Interior)?;
        Ok(Selection { tile, strategy })
    }

    /// Chooses a tile for `cell`, scores it and appends it to the ledger.
    pub fn place(
        &mut self,
        cell: GridCell,
        layout: &GridLayout,
        ledger: &mut Ledger,
    ) -> Result<TileId, ZoneError> {
        if ledger.at(cell).is_some() {
            return Err(ZoneError::DuplicatePlacement { cell });
        }

        let selection = self.select(cell, layout, ledger)?;
        let placement = layout.classify(cell);
        let definition = self.catalog.lookup(selection.tile)?;
        let coefficients = self.coefficients.compute(definition, placement);
        let position = layout.position_of(cell);

        let index = ledger.record(PlacedZone {
            tile: selection.tile,
            cell,
            position,
            placement,
            strategy: selection.strategy,
            coefficients,
        })?;
        log::debug!(
            "#{index}: {} at ({}, {}) via {:?}, defensiveness {:.3}, flanking {:.3}",
            selection.tile,
            cell.column(),
            cell.row(),
            selection.strategy,
            coefficients.defensiveness,
            coefficients.flanking
        );
        Ok(selection.tile)
    }

    /// Same as [`TileSelector::place`] for a cell addressed by its position.
    pub fn place_at(
        &mut self,
        position: GridPosition,
        layout: &GridLayout,
        ledger: &mut Ledger,
    ) -> Result<TileId, ZoneError> {
        let cell = layout.cell_at(position)?;
        self.place(cell, layout, ledger)
    }

    fn select_corner(
        &self,
        cell: GridCell,
        corner: Corner,
        ledger: &Ledger,
    ) -> Result<Selection, ZoneError> {
        let constraints = self.neighbour_constraints(cell, ledger, &Side::ALL)?;

        let mut best: Option<(TileId, usize)> = None;
        for &candidate in self.catalog.perimeter().corner_candidates(corner) {
            let score = constraints.satisfied_by(self.catalog.lookup(candidate)?);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }

        best.map(|(tile, _)| Selection {
            tile,
            strategy: SelectionStrategy::CornerSet,
        })
        .ok_or(ZoneError::EmptyCandidateSet)
    }

    fn select_interior(&mut self, cell: GridCell, ledger: &Ledger) -> Result<Selection, ZoneError> {
        let west = ledger.neighbour(cell, Side::West).map(|zone| zone.tile);
        let south = ledger.neighbour(cell, Side::South).map(|zone| zone.tile);

        if let Some(allowed) = self.whitelisted(west, south) {
            let tile = self.break_tie(&allowed, Placement::Interior)?;
            return Ok(Selection {
                tile,
                strategy: SelectionStrategy::Whitelist,
            });
        }

        let constraints = self.neighbour_constraints(cell, ledger, &[Side::West, Side::South])?;
        self.select_with_constraints(cell, &constraints)
    }

    /// Whitelist triggered by the West or South neighbour. When both trigger
    /// the intersection applies, falling back to the West list if it is empty.
    fn whitelisted(&self, west: Option<TileId>, south: Option<TileId>) -> Option<Vec<TileId>> {
        let west = west.and_then(|tile| self.catalog.whitelist(tile));
        let south = south.and_then(|tile| self.catalog.whitelist(tile));

        match (west, south) {
            (Some(west), Some(south)) => {
                let both: Vec<TileId> = west
                    .iter()
                    .copied()
                    .filter(|tile| south.contains(tile))
                    .collect();
                Some(if both.is_empty() { west.to_vec() } else { both })
            }
            (Some(list), None) | (None, Some(list)) => Some(list.to_vec()),
            (None, None) => None,
        }
    }

    fn neighbour_constraints(
        &self,
        cell: GridCell,
        ledger: &Ledger,
        sides: &[Side],
    ) -> Result<EdgeConstraints, ZoneError> {
        let mut constraints = EdgeConstraints::new();
        for &side in sides {
            if let Some(zone) = ledger.neighbour(cell, side) {
                let neighbour = self.catalog.lookup(zone.tile)?;
                constraints.require(side, neighbour.edge(side.opposite()));
            }
        }
        Ok(constraints)
    }

    fn apply_drift(
        &mut self,
        candidates: Vec<TileId>,
        constraints: &EdgeConstraints,
    ) -> Result<Vec<TileId>, ZoneError> {
        let mut preferences = EdgeConstraints::new();
        let open: Vec<Side> = constraints.unconstrained_sides().collect();
        for side in open {
            if let Some(colour) = self.config.drift.sample(&mut self.rng) {
                preferences.require(side, colour);
            }
        }
        if preferences.is_empty() {
            return Ok(candidates);
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for tile in candidates {
            scored.push((tile, preferences.satisfied_by(self.catalog.lookup(tile)?)));
        }
        let best = scored.iter().map(|(_, score)| *score).max().unwrap_or(0);
        Ok(scored
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(tile, _)| tile)
            .collect())
    }

    fn break_tie(
        &mut self,
        candidates: &[TileId],
        placement: Placement,
    ) -> Result<TileId, ZoneError> {
        let TieBreak::Balanced {
            target_defensiveness,
            dispersion,
        } = self.config.tie_break
        else {
            return self.choose(candidates);
        };

        let mut preferred = Vec::new();
        for &tile in candidates {
            if dispersion.accepts(self.catalog.lookup(tile)?) {
                preferred.push(tile);
            }
        }
        let pool: &[TileId] = if preferred.is_empty() {
            candidates
        } else {
            &preferred
        };

        let mut closest = Vec::new();
        let mut best = f32::INFINITY;
        for &tile in pool {
            let definition = self.catalog.lookup(tile)?;
            let defensiveness = self
                .coefficients
                .compute(definition, placement)
                .defensiveness;
            let distance = (defensiveness - target_defensiveness).abs();
            if distance < best {
                best = distance;
                closest.clear();
                closest.push(tile);
            } else if distance == best {
                closest.push(tile);
            }
        }
        self.choose(&closest)
    }

    fn choose(&mut self, candidates: &[TileId]) -> Result<TileId, ZoneError> {
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(ZoneError::EmptyCandidateSet)
    }
}

fn exact_matches(tiles: &[TileDefinition], constraints: &EdgeConstraints) -> Vec<TileId> {
    tiles
        .iter()
        .filter(|tile| constraints.matched_by(tile))
        .map(TileDefinition::id)
        .collect()
}

fn best_partial_matches(
    tiles: &[TileDefinition],
    constraints: &EdgeConstraints,
    threshold: usize,
) -> Vec<TileId> {
    let scored: Vec<(TileId, usize)> = tiles
        .iter()
        .map(|tile| (tile.id(), constraints.satisfied_by(tile)))
        .filter(|(_, score)| *score >= threshold)
        .collect();
    let Some(best) = scored.iter().map(|(_, score)| *score).max() else {
        return Vec::new();
    };
    scored
        .into_iter()
        .filter(|(_, score)| *score == best)
        .map(|(tile, _)| tile)
        .collect()
}
