#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Balanced Zones level generator.
//!
//! This crate defines the vocabulary every other crate speaks: edge colours,
//! tile identifiers and definitions, grid cells and world positions, the
//! placement classification of a cell, and the record committed for every
//! placed zone. The catalog owns tile definitions, the level crate owns the
//! ledger of [`PlacedZone`] values, and the systems consume both to decide
//! which tile lands in which cell.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of Wang tiles in the standard zone catalog.
pub const TILE_COUNT: usize = 22;

/// Maximum number of geometry pieces any catalog tile contains.
///
/// Used to normalise object and path densities.
pub const HIGHEST_ZONE_VOLUME: f32 = 5.0;

/// Dispersion of a zone made of a single component.
pub const PURE_EVEN_ZONE_DISPERSION: f32 = 1.0;

/// Dispersion of a zone made of two components.
pub const HALF_EVEN_ZONE_DISPERSION: f32 = 0.5;

/// Dispersion of a corner piece.
pub const CORNER_PIECE_ZONE_DISPERSION: f32 = 0.25;

/// Prefix shared by every tile asset name.
const ASSET_NAME_PREFIX: &str = "WangTile";

/// Colour carried by one edge of a Wang tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeColour {
    /// Unconstrained or unknown. Never a property of a catalog tile.
    Colourless,
    /// Grey edge.
    Grey,
    /// Red edge.
    Red,
    /// Green edge.
    Green,
    /// Blue edge, the "pure wall" colour placed against the level boundary.
    Blue,
}

impl EdgeColour {
    /// Reports whether the colour is the unconstrained sentinel.
    #[must_use]
    pub const fn is_colourless(self) -> bool {
        matches!(self, Self::Colourless)
    }

    /// Reports whether the edge is a solid wall rather than an opening.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Blue)
    }
}

/// Sides of a square tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Side {
    /// Every side in canonical edge order: North, East, South, West.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Position of the side inside an edge-colour array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Side facing this one across a shared edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Index of a tile inside the zone catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u8);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Identifier as a slice index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Name of the asset that materialises this tile, e.g. `WangTile1` for id 0.
    #[must_use]
    pub fn asset_name(&self) -> String {
        format!("{ASSET_NAME_PREFIX}{}", u16::from(self.0) + 1)
    }

    /// Parses an asset name such as `WangTile22` back into its identifier.
    #[must_use]
    pub fn from_asset_name(name: &str) -> Option<Self> {
        let number: u16 = name.strip_prefix(ASSET_NAME_PREFIX)?.parse().ok()?;
        let id = number.checked_sub(1)?;
        u8::try_from(id).ok().map(Self)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.asset_name())
    }
}

/// Static description of one Wang tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileDefinition {
    id: TileId,
    edges: [EdgeColour; 4],
    dispersion: f32,
    object_count: u8,
}

impl TileDefinition {
    /// Creates a tile definition. `edges` are ordered North, East, South, West.
    #[must_use]
    pub const fn new(
        id: TileId,
        edges: [EdgeColour; 4],
        dispersion: f32,
        object_count: u8,
    ) -> Self {
        Self {
            id,
            edges,
            dispersion,
            object_count,
        }
    }

    /// Identifier of the tile.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Colour of the edge on the provided side.
    #[must_use]
    pub const fn edge(&self, side: Side) -> EdgeColour {
        self.edges[side.index()]
    }

    /// All four edge colours in North, East, South, West order.
    #[must_use]
    pub const fn edges(&self) -> [EdgeColour; 4] {
        self.edges
    }

    /// Fixed dispersion coefficient of the tile's internal geometry.
    #[must_use]
    pub const fn dispersion(&self) -> f32 {
        self.dispersion
    }

    /// Number of geometry pieces placed inside the tile.
    #[must_use]
    pub const fn object_count(&self) -> u8 {
        self.object_count
    }

    /// Single-component tile.
    #[must_use]
    pub fn has_pure_even_dispersion(&self) -> bool {
        self.dispersion == PURE_EVEN_ZONE_DISPERSION
    }

    /// Two-component tile.
    #[must_use]
    pub fn has_half_even_dispersion(&self) -> bool {
        self.dispersion == HALF_EVEN_ZONE_DISPERSION
    }

    /// Corner-piece tile.
    #[must_use]
    pub fn is_corner_piece(&self) -> bool {
        self.dispersion == CORNER_PIECE_ZONE_DISPERSION
    }
}

/// Location of a grid cell expressed as column and row indices.
///
/// Row zero is the north row and column zero the west column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    column: u32,
    row: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell on the provided side, if it lies inside a
    /// `columns` x `rows` grid.
    #[must_use]
    pub fn neighbour(self, side: Side, columns: u32, rows: u32) -> Option<GridCell> {
        let (column, row) = match side {
            Side::North => (Some(self.column), self.row.checked_sub(1)),
            Side::East => (self.column.checked_add(1), Some(self.row)),
            Side::South => (Some(self.column), self.row.checked_add(1)),
            Side::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        (column < columns && row < rows).then_some(GridCell::new(column, row))
    }
}

/// Point in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    x: f32,
    y: f32,
}

impl GridPosition {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate. Grows eastwards.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate. Grows southwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Width and height of the play area in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    width: f32,
    height: f32,
}

impl Size2D {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// The four corners of the play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// North-west corner.
    TopLeft,
    /// North-east corner.
    TopRight,
    /// South-east corner.
    BottomRight,
    /// South-west corner.
    BottomLeft,
}

impl Corner {
    /// Every corner, clockwise from the top left.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Sides of a corner tile that face the level boundary.
    #[must_use]
    pub const fn outward_sides(self) -> [Side; 2] {
        match self {
            Self::TopLeft => [Side::North, Side::West],
            Self::TopRight => [Side::North, Side::East],
            Self::BottomRight => [Side::East, Side::South],
            Self::BottomLeft => [Side::South, Side::West],
        }
    }
}

/// Positional category of a cell relative to the play-area extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Placement {
    /// One of the four corner cells.
    Corner(Corner),
    /// A non-corner cell on the outermost ring, facing the given side.
    Boundary(Side),
    /// Any other cell.
    Interior,
}

impl Placement {
    /// Number of zones surrounding a cell of this category, diagonals included.
    #[must_use]
    pub const fn surrounding_zone_count(self) -> u8 {
        match self {
            Self::Corner(_) => 3,
            Self::Boundary(_) => 5,
            Self::Interior => 8,
        }
    }

    /// Number of zones sharing an edge with a cell of this category.
    #[must_use]
    pub const fn adjacent_zone_count(self) -> u8 {
        match self {
            Self::Corner(_) => 2,
            Self::Boundary(_) => 3,
            Self::Interior => 4,
        }
    }

    /// Reports whether the side faces the level boundary.
    #[must_use]
    pub fn is_outward(self, side: Side) -> bool {
        match self {
            Self::Corner(corner) => corner.outward_sides().contains(&side),
            Self::Boundary(outward) => outward == side,
            Self::Interior => false,
        }
    }

    /// Sides that touch a neighbouring zone.
    pub fn adjacent_sides(self) -> impl Iterator<Item = Side> {
        Side::ALL
            .into_iter()
            .filter(move |side| !self.is_outward(*side))
    }
}

/// Level-balance heuristics computed when a zone is committed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coefficients {
    /// How defensible the zone is given its contents and open edges.
    pub defensiveness: f32,
    /// How exposed the zone is to flanking given its neighbour count.
    pub flanking: f32,
}

/// Strategy that produced a committed tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SelectionStrategy {
    /// Picked from a corner's fixed candidate set.
    CornerSet,
    /// Fixed tile for a boundary side.
    BoundaryTile,
    /// Every constrained edge matched.
    ExactMatch,
    /// No exact match existed; best-scoring entries were used.
    PartialMatch,
    /// A neighbour's adjacency whitelist overrode colour matching.
    Whitelist,
    /// No neighbour constrained the cell.
    Unconstrained,
}

/// Record of a tile committed to a grid cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedZone {
    /// Tile occupying the cell.
    pub tile: TileId,
    /// Cell the tile occupies.
    pub cell: GridCell,
    /// Centre of the cell in world units.
    pub position: GridPosition,
    /// Positional category of the cell.
    pub placement: Placement,
    /// Strategy that chose the tile.
    pub strategy: SelectionStrategy,
    /// Balance heuristics computed at commit time.
    pub coefficients: Coefficients,
}

/// Failures raised while selecting and committing zones.
///
/// Every variant points at a catalog or configuration problem; none are
/// retried.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ZoneError {
    /// Catalog lookup with an identifier the catalog does not contain.
    #[error("tile id {id} is outside the zone catalog")]
    OutOfRangeTileId {
        /// Offending identifier.
        id: u8,
    },
    /// Neither an exact nor a partial match exists for the cell.
    #[error("no applicable tile for cell ({}, {})", cell.column(), cell.row())]
    NoApplicableTile {
        /// Cell that could not be filled.
        cell: GridCell,
    },
    /// A random choice was attempted over zero candidates.
    #[error("random choice attempted over an empty candidate set")]
    EmptyCandidateSet,
    /// A zone was committed to an already occupied cell.
    #[error("cell ({}, {}) already holds a zone", cell.column(), cell.row())]
    DuplicatePlacement {
        /// Cell that was already occupied.
        cell: GridCell,
    },
    /// A world position that is not the centre of any grid cell.
    #[error("position ({x}, {y}) is not a cell centre of the level grid")]
    PositionOffGrid {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },
    /// Level extents or cell size cannot describe a grid.
    #[error("invalid level layout: {reason}")]
    InvalidLayout {
        /// Explanation of the rejected value.
        reason: String,
    },
}
