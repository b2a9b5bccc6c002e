#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable Wang-tile catalog shared by the zone selection systems.

mod resource;

use std::collections::BTreeSet;

use balanced_zones_core::{
    Corner, EdgeColour, Side, TileDefinition, TileId, ZoneError, HIGHEST_ZONE_VOLUME, TILE_COUNT,
};
use thiserror::Error;

pub use resource::SUPPORTED_CATALOG_VERSION;

/// TOML rendition of [`ZoneCatalog::standard`].
pub const STANDARD_CATALOG_TOML: &str = include_str!("../assets/standard_catalog.toml");

const B: EdgeColour = EdgeColour::Blue;
const R: EdgeColour = EdgeColour::Red;
const G: EdgeColour = EdgeColour::Green;
const Y: EdgeColour = EdgeColour::Grey;

const fn tile(id: u8, edges: [EdgeColour; 4], objects: u8, dispersion: f32) -> TileDefinition {
    TileDefinition::new(TileId::new(id), edges, dispersion, objects)
}

const STANDARD_TILES: [TileDefinition; TILE_COUNT] = [
    tile(0, [B, R, B, B], 5, 0.2),
    tile(1, [B, R, B, R], 2, 0.5),
    tile(2, [B, R, R, B], 4, 0.25),
    tile(3, [B, B, R, R], 4, 0.25),
    tile(4, [R, B, B, R], 4, 0.25),
    tile(5, [R, R, B, B], 4, 0.25),
    tile(6, [R, R, R, R], 1, 1.0),
    tile(7, [B, B, R, B], 5, 0.2),
    tile(8, [R, R, R, R], 1, 1.0),
    tile(9, [R, B, R, B], 2, 0.5),
    tile(10, [B, B, B, Y], 5, 0.2),
    tile(11, [B, Y, G, G], 2, 0.5),
    tile(12, [G, G, B, G], 2, 0.5),
    tile(13, [G, B, G, B], 2, 0.5),
    tile(14, [R, R, R, Y], 1, 1.0),
    tile(15, [G, Y, G, Y], 1, 1.0),
    tile(16, [G, G, G, G], 1, 1.0),
    tile(17, [R, B, B, B], 5, 0.2),
    tile(18, [B, R, G, R], 2, 0.5),
    tile(19, [R, B, R, G], 2, 0.5),
    tile(20, [G, R, B, R], 2, 0.5),
    tile(21, [R, G, R, B], 2, 0.5),
];

const fn ids<const N: usize>(values: [u8; N]) -> [TileId; N] {
    let mut out = [TileId::new(0); N];
    let mut index = 0;
    while index < N {
        out[index] = TileId::new(values[index]);
        index += 1;
    }
    out
}

/// Errors raised while parsing or validating a zone catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The resource is not valid TOML for the catalog schema.
    #[error("failed to parse zone catalog: {0}")]
    Parse(#[from] toml::de::Error),
    /// The resource declares a schema version this build cannot read.
    #[error("unsupported zone catalog version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the resource.
        found: u32,
        /// Version understood by this build.
        expected: u32,
    },
    /// The catalog contains no tiles.
    #[error("zone catalog contains no tiles")]
    Empty,
    /// Tile names must be `WangTile1`, `WangTile2`, ... in order.
    #[error("tile #{index} is named `{name}`; expected `{expected}`")]
    NonSequentialName {
        /// Position of the entry in the resource.
        index: usize,
        /// Name found at that position.
        name: String,
        /// Name required at that position.
        expected: String,
    },
    /// A perimeter rule or whitelist references a tile that does not exist.
    #[error("unknown tile `{name}` referenced by the zone catalog")]
    UnknownTile {
        /// Unresolved reference.
        name: String,
    },
    /// A tile carries the unconstrained sentinel colour on one of its edges.
    #[error("tile `{name}` has a colourless {side:?} edge")]
    ColourlessEdge {
        /// Offending tile.
        name: String,
        /// Side carrying the sentinel.
        side: Side,
    },
    /// Dispersion must lie in `(0, 1]`.
    #[error("tile `{name}` has dispersion {dispersion} outside (0, 1]")]
    DispersionOutOfRange {
        /// Offending tile.
        name: String,
        /// Declared dispersion.
        dispersion: f32,
    },
    /// Object count must lie in `1..=HIGHEST_ZONE_VOLUME`.
    #[error("tile `{name}` holds {objects} objects; expected 1..={max}")]
    ObjectCountOutOfRange {
        /// Offending tile.
        name: String,
        /// Declared object count.
        objects: u8,
        /// Largest accepted object count.
        max: u8,
    },
    /// A corner declares no candidate tiles.
    #[error("corner {corner:?} has no candidate tiles")]
    EmptyCornerCandidates {
        /// Corner without candidates.
        corner: Corner,
    },
    /// A whitelist allows no tiles, leaving its neighbour nothing to pick from.
    #[error("whitelist for `{name}` allows no tiles")]
    EmptyWhitelist {
        /// Neighbour owning the whitelist.
        name: String,
    },
    /// A perimeter tile lacks a Blue edge on a side that faces the level boundary.
    #[error("perimeter tile `{name}` is not walled on its {side:?} side")]
    PerimeterNotWalled {
        /// Offending tile.
        name: String,
        /// Outward side without a wall.
        side: Side,
    },
}

/// Tiles allowed on the level perimeter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerimeterRules {
    corners: [Vec<TileId>; 4],
    boundary: [TileId; 4],
}

impl PerimeterRules {
    /// Creates perimeter rules from per-corner candidate lists (clockwise from
    /// the top left) and per-side boundary tiles (North, East, South, West).
    #[must_use]
    pub fn new(corners: [Vec<TileId>; 4], boundary: [TileId; 4]) -> Self {
        Self { corners, boundary }
    }

    /// Candidate tiles for a corner in preference order.
    #[must_use]
    pub fn corner_candidates(&self, corner: Corner) -> &[TileId] {
        &self.corners[corner_index(corner)]
    }

    /// Fixed tile placed on the non-corner cells of a boundary side.
    #[must_use]
    pub fn boundary_tile(&self, side: Side) -> TileId {
        self.boundary[side.index()]
    }
}

const fn corner_index(corner: Corner) -> usize {
    match corner {
        Corner::TopLeft => 0,
        Corner::TopRight => 1,
        Corner::BottomRight => 2,
        Corner::BottomLeft => 3,
    }
}

/// Restricts the tiles that may follow a specific neighbour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyWhitelist {
    neighbour: TileId,
    allowed: Vec<TileId>,
}

impl AdjacencyWhitelist {
    /// Creates a whitelist for tiles placed next to `neighbour`.
    #[must_use]
    pub fn new(neighbour: TileId, allowed: Vec<TileId>) -> Self {
        Self { neighbour, allowed }
    }
}

/// Read-only table of Wang tiles plus the placement rules that reference them.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneCatalog {
    tiles: Vec<TileDefinition>,
    perimeter: PerimeterRules,
    whitelists: Vec<AdjacencyWhitelist>,
}

impl ZoneCatalog {
    /// Builds a catalog after validating every tile and rule.
    pub fn new(
        tiles: Vec<TileDefinition>,
        perimeter: PerimeterRules,
        whitelists: Vec<AdjacencyWhitelist>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            tiles,
            perimeter,
            whitelists,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in 22-tile catalog.
    #[must_use]
    pub fn standard() -> Self {
        let perimeter = PerimeterRules::new(
            [
                ids([2, 0, 7]).to_vec(),
                ids([3, 10, 7]).to_vec(),
                ids([4, 10, 17]).to_vec(),
                ids([5, 0, 17]).to_vec(),
            ],
            ids([18, 19, 20, 21]),
        );
        let whitelists = vec![
            AdjacencyWhitelist::new(TileId::new(1), ids([2, 3, 5, 6, 8, 9, 10, 13]).to_vec()),
            AdjacencyWhitelist::new(TileId::new(9), ids([3, 4, 5, 10, 11, 14, 15, 17]).to_vec()),
        ];
        Self {
            tiles: STANDARD_TILES.to_vec(),
            perimeter,
            whitelists,
        }
    }

    /// Parses and validates a catalog from its TOML representation.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let catalog = resource::parse(contents)?;
        log::debug!(
            "loaded zone catalog with {} tiles and {} whitelists",
            catalog.tiles.len(),
            catalog.whitelists.len()
        );
        Ok(catalog)
    }

    /// Retrieves the definition for a tile identifier.
    pub fn lookup(&self, id: TileId) -> Result<&TileDefinition, ZoneError> {
        self.tiles
            .get(id.index())
            .ok_or(ZoneError::OutOfRangeTileId { id: id.get() })
    }

    /// All tile definitions ordered by identifier.
    #[must_use]
    pub fn tiles(&self) -> &[TileDefinition] {
        &self.tiles
    }

    /// Iterates over every tile identifier in the catalog.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(TileDefinition::id)
    }

    /// Number of tiles in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the catalog holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Perimeter placement rules.
    #[must_use]
    pub fn perimeter(&self) -> &PerimeterRules {
        &self.perimeter
    }

    /// Whitelist triggered by the provided neighbour, if any.
    #[must_use]
    pub fn whitelist(&self, neighbour: TileId) -> Option<&[TileId]> {
        self.whitelists
            .iter()
            .find(|whitelist| whitelist.neighbour == neighbour)
            .map(|whitelist| whitelist.allowed.as_slice())
    }

    /// `(west, south)` colour pairs an interior cell may require for which no
    /// tile matches exactly.
    ///
    /// West requirements come from neighbours' East edges and South
    /// requirements from neighbours' North edges. An empty result means exact
    /// interior matches always exist.
    #[must_use]
    pub fn interior_gaps(&self) -> Vec<(EdgeColour, EdgeColour)> {
        let west: BTreeSet<EdgeColour> = self.tiles.iter().map(|t| t.edge(Side::East)).collect();
        let south: BTreeSet<EdgeColour> = self.tiles.iter().map(|t| t.edge(Side::North)).collect();

        let mut gaps = Vec::new();
        for &w in &west {
            for &s in &south {
                let covered = self
                    .tiles
                    .iter()
                    .any(|t| t.edge(Side::West) == w && t.edge(Side::South) == s);
                if !covered {
                    gaps.push((w, s));
                }
            }
        }
        gaps
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.tiles.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, definition) in self.tiles.iter().enumerate() {
            let name = definition.id().asset_name();
            if definition.id().index() != index {
                return Err(CatalogError::NonSequentialName {
                    index,
                    name,
                    expected: format!("WangTile{}", index + 1),
                });
            }
            if let Some(side) = Side::ALL
                .into_iter()
                .find(|side| definition.edge(*side).is_colourless())
            {
                return Err(CatalogError::ColourlessEdge { name, side });
            }
            let dispersion = definition.dispersion();
            if !(dispersion > 0.0 && dispersion <= 1.0) {
                return Err(CatalogError::DispersionOutOfRange { name, dispersion });
            }
            let objects = definition.object_count();
            if objects == 0 || f32::from(objects) > HIGHEST_ZONE_VOLUME {
                return Err(CatalogError::ObjectCountOutOfRange {
                    name,
                    objects,
                    max: HIGHEST_ZONE_VOLUME as u8,
                });
            }
        }

        for corner in Corner::ALL {
            let candidates = self.perimeter.corner_candidates(corner);
            if candidates.is_empty() {
                return Err(CatalogError::EmptyCornerCandidates { corner });
            }
            for &candidate in candidates {
                self.require_walled(candidate, &corner.outward_sides())?;
            }
        }
        for side in Side::ALL {
            self.require_walled(self.perimeter.boundary_tile(side), &[side])?;
        }

        for whitelist in &self.whitelists {
            let _ = self.require_known(whitelist.neighbour)?;
            if whitelist.allowed.is_empty() {
                return Err(CatalogError::EmptyWhitelist {
                    name: whitelist.neighbour.asset_name(),
                });
            }
            for &allowed in &whitelist.allowed {
                let _ = self.require_known(allowed)?;
            }
        }
        Ok(())
    }

    fn require_known(&self, id: TileId) -> Result<&TileDefinition, CatalogError> {
        self.tiles.get(id.index()).ok_or_else(|| CatalogError::UnknownTile {
            name: id.asset_name(),
        })
    }

    fn require_walled(&self, id: TileId, sides: &[Side]) -> Result<(), CatalogError> {
        let definition = self.require_known(id)?;
        match sides.iter().find(|side| !definition.edge(**side).is_wall()) {
            Some(&side) => Err(CatalogError::PerimeterNotWalled {
                name: id.asset_name(),
                side,
            }),
            None => Ok(()),
        }
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_parts() -> (Vec<TileDefinition>, PerimeterRules, Vec<AdjacencyWhitelist>) {
        let catalog = ZoneCatalog::standard();
        (
            catalog.tiles.clone(),
            catalog.perimeter.clone(),
            catalog.whitelists.clone(),
        )
    }

    #[test]
    fn standard_catalog_passes_validation() {
        let (tiles, perimeter, whitelists) = standard_parts();
        let catalog = ZoneCatalog::new(tiles, perimeter, whitelists).expect("valid catalog");
        assert_eq!(catalog, ZoneCatalog::standard());
        assert_eq!(catalog.len(), TILE_COUNT);
    }

    #[test]
    fn lookup_rejects_ids_past_the_table() {
        let catalog = ZoneCatalog::standard();
        assert_eq!(
            catalog.lookup(TileId::new(22)),
            Err(ZoneError::OutOfRangeTileId { id: 22 })
        );
        assert!(catalog.lookup(TileId::new(21)).is_ok());
    }

    #[test]
    fn validation_rejects_unwalled_boundary_tile() {
        let (tiles, perimeter, whitelists) = standard_parts();
        let mut boundary = perimeter.boundary;
        boundary[Side::North.index()] = TileId::new(6);
        let perimeter = PerimeterRules::new(perimeter.corners, boundary);

        let error = ZoneCatalog::new(tiles, perimeter, whitelists).unwrap_err();
        assert!(matches!(
            error,
            CatalogError::PerimeterNotWalled {
                side: Side::North,
                ..
            }
        ));
    }

    #[test]
    fn validation_rejects_colourless_edges() {
        let (mut tiles, perimeter, whitelists) = standard_parts();
        tiles[6] = TileDefinition::new(
            TileId::new(6),
            [R, R, EdgeColour::Colourless, R],
            1.0,
            1,
        );

        let error = ZoneCatalog::new(tiles, perimeter, whitelists).unwrap_err();
        assert!(matches!(
            error,
            CatalogError::ColourlessEdge {
                side: Side::South,
                ..
            }
        ));
    }

    #[test]
    fn validation_rejects_whitelist_to_unknown_tile() {
        let (tiles, perimeter, mut whitelists) = standard_parts();
        whitelists.push(AdjacencyWhitelist::new(TileId::new(40), Vec::new()));

        let error = ZoneCatalog::new(tiles, perimeter, whitelists).unwrap_err();
        assert!(matches!(error, CatalogError::UnknownTile { name } if name == "WangTile41"));
    }

    #[test]
    fn validation_rejects_whitelist_without_tiles() {
        let (tiles, perimeter, mut whitelists) = standard_parts();
        whitelists[1] = AdjacencyWhitelist::new(TileId::new(9), Vec::new());

        let error = ZoneCatalog::new(tiles, perimeter, whitelists).unwrap_err();
        assert!(matches!(error, CatalogError::EmptyWhitelist { name } if name == "WangTile10"));
    }

    #[test]
    fn removing_tiles_opens_interior_gaps() {
        let (tiles, _, _) = standard_parts();
        let trimmed: Vec<TileDefinition> = tiles.into_iter().take(10).collect();
        let catalog = ZoneCatalog {
            tiles: trimmed,
            perimeter: ZoneCatalog::standard().perimeter,
            whitelists: Vec::new(),
        };
        assert!(catalog.interior_gaps().is_empty());

        let (mut tiles, perimeter, whitelists) = standard_parts();
        tiles.retain(|definition| definition.id() != TileId::new(19));
        let catalog = ZoneCatalog {
            tiles,
            perimeter,
            whitelists,
        };
        assert_eq!(catalog.interior_gaps(), vec![(G, R)]);
    }
}
