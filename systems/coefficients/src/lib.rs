#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level-balance coefficients computed for a tile at commit time.
//!
//! Defensiveness blends how cluttered a tile is with how much traffic its
//! touching edges admit; flanking reflects how many of a cell's surrounding
//! zones share an edge with it. Neither value participates in edge matching.

use balanced_zones_core::{Coefficients, Placement, TileDefinition, HIGHEST_ZONE_VOLUME};

/// Tuning knobs for the coefficient formulas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientTuning {
    /// Normaliser for object and path densities; the largest object count of any tile.
    pub highest_zone_volume: f32,
    /// Weight subtracted for every adjacent side whose edge is open.
    pub open_edge_weight: f32,
    /// Weight subtracted for every adjacent side whose edge is a wall.
    pub walled_edge_weight: f32,
}

impl Default for CoefficientTuning {
    fn default() -> Self {
        Self {
            highest_zone_volume: HIGHEST_ZONE_VOLUME,
            open_edge_weight: 7.0,
            walled_edge_weight: 12.0,
        }
    }
}

/// Pure calculator for [`Coefficients`].
#[derive(Clone, Debug, Default)]
pub struct CoefficientEngine {
    tuning: CoefficientTuning,
}

impl CoefficientEngine {
    /// Creates an engine with the provided tuning.
    #[must_use]
    pub fn new(tuning: CoefficientTuning) -> Self {
        Self { tuning }
    }

    /// Tuning currently applied by the engine.
    #[must_use]
    pub fn tuning(&self) -> &CoefficientTuning {
        &self.tuning
    }

    /// Coefficients for `tile` committed to a cell of the given category.
    #[must_use]
    pub fn compute(&self, tile: &TileDefinition, placement: Placement) -> Coefficients {
        let defensiveness =
            (self.object_density(tile) + self.path_density(tile, placement)) / 2.0;
        Coefficients {
            defensiveness,
            flanking: self.flanking(placement),
        }
    }

    /// `1 - adjacent / surrounding` for the cell category.
    #[must_use]
    pub fn flanking(&self, placement: Placement) -> f32 {
        let adjacent = f32::from(placement.adjacent_zone_count());
        let surrounding = f32::from(placement.surrounding_zone_count());
        1.0 - adjacent / surrounding
    }

    /// Share of the maximum zone volume occupied by the tile's geometry.
    #[must_use]
    pub fn object_density(&self, tile: &TileDefinition) -> f32 {
        f32::from(tile.object_count()) / self.tuning.highest_zone_volume
    }

    /// Edge-traffic term: the zone volume minus one weight per adjacent side,
    /// taken as a magnitude and normalised by the zone volume.
    #[must_use]
    pub fn path_density(&self, tile: &TileDefinition, placement: Placement) -> f32 {
        let touching: f32 = placement
            .adjacent_sides()
            .map(|side| {
                if tile.edge(side).is_wall() {
                    self.tuning.walled_edge_weight
                } else {
                    self.tuning.open_edge_weight
                }
            })
            .sum();
        (self.tuning.highest_zone_volume - touching).abs() / self.tuning.highest_zone_volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanced_zones_core::{Corner, EdgeColour, Side, TileId};

    const B: EdgeColour = EdgeColour::Blue;
    const R: EdgeColour = EdgeColour::Red;
    const G: EdgeColour = EdgeColour::Green;

    fn close(actual: f32, expected: f32) -> bool {
        (actual - expected).abs() < 1e-5
    }

    #[test]
    fn flanking_depends_on_category_only() {
        let engine = CoefficientEngine::default();
        assert!(close(
            engine.flanking(Placement::Corner(Corner::TopLeft)),
            1.0 / 3.0
        ));
        assert!(close(engine.flanking(Placement::Boundary(Side::West)), 0.4));
        assert!(close(engine.flanking(Placement::Interior), 0.5));
    }

    #[test]
    fn open_interior_crossroads() {
        let engine = CoefficientEngine::default();
        let tile = TileDefinition::new(TileId::new(6), [R; 4], 1.0, 1);

        assert!(close(engine.object_density(&tile), 0.2));
        assert!(close(engine.path_density(&tile, Placement::Interior), 4.6));
        let coefficients = engine.compute(&tile, Placement::Interior);
        assert!(close(coefficients.defensiveness, 2.4));
        assert!(close(coefficients.flanking, 0.5));
    }

    #[test]
    fn walled_sides_weigh_more() {
        let engine = CoefficientEngine::default();
        let dead_end = TileDefinition::new(TileId::new(0), [B, R, B, B], 0.2, 5);

        assert!(close(engine.path_density(&dead_end, Placement::Interior), 7.6));
        assert!(close(
            engine.compute(&dead_end, Placement::Interior).defensiveness,
            4.3
        ));
    }

    #[test]
    fn outward_sides_are_ignored() {
        let engine = CoefficientEngine::default();
        let corner = TileDefinition::new(TileId::new(2), [B, R, R, B], 0.25, 4);
        let boundary = TileDefinition::new(TileId::new(18), [B, R, G, R], 0.5, 2);

        let corner_coefficients = engine.compute(&corner, Placement::Corner(Corner::TopLeft));
        assert!(close(corner_coefficients.defensiveness, (0.8 + 1.8) / 2.0));

        let boundary_coefficients = engine.compute(&boundary, Placement::Boundary(Side::North));
        assert!(close(boundary_coefficients.defensiveness, (0.4 + 3.2) / 2.0));
        assert!(close(boundary_coefficients.flanking, 0.4));
    }

    #[test]
    fn tuning_changes_edge_weights() {
        let engine = CoefficientEngine::new(CoefficientTuning {
            open_edge_weight: 1.0,
            ..CoefficientTuning::default()
        });
        let tile = TileDefinition::new(TileId::new(6), [R; 4], 1.0, 1);

        assert!(close(engine.path_density(&tile, Placement::Interior), 0.2));
        assert_eq!(engine.tuning().walled_edge_weight, 12.0);
    }
}
