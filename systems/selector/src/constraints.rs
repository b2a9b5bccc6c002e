use balanced_zones_core::{EdgeColour, Side, TileDefinition};

/// Edge colours a tile must show, tracked per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeConstraints {
    sides: [Option<EdgeColour>; 4],
}

impl EdgeConstraints {
    /// Creates an empty constraint set.
    #[must_use]
    pub const fn new() -> Self {
        Self { sides: [None; 4] }
    }

    /// Returns a copy that also requires `colour` on `side`.
    #[must_use]
    pub fn with(mut self, side: Side, colour: EdgeColour) -> Self {
        self.require(side, colour);
        self
    }

    /// Requires `colour` on `side`. Colourless lifts the requirement.
    pub fn require(&mut self, side: Side, colour: EdgeColour) {
        self.sides[side.index()] = (!colour.is_colourless()).then_some(colour);
    }

    /// Colour required on the side, if any.
    #[must_use]
    pub const fn get(&self, side: Side) -> Option<EdgeColour> {
        self.sides[side.index()]
    }

    /// Number of constrained sides.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sides.iter().flatten().count()
    }

    /// Reports whether no side is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Sides without a requirement.
    pub fn unconstrained_sides(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL
            .into_iter()
            .filter(|side| self.get(*side).is_none())
    }

    /// Number of requirements the tile satisfies.
    #[must_use]
    pub fn satisfied_by(&self, tile: &TileDefinition) -> usize {
        Side::ALL
            .into_iter()
            .filter(|side| self.get(*side) == Some(tile.edge(*side)))
            .count()
    }

    /// Reports whether the tile satisfies every requirement.
    #[must_use]
    pub fn matched_by(&self, tile: &TileDefinition) -> bool {
        self.satisfied_by(tile) == self.count()
    }
}
