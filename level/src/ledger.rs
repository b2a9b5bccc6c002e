use std::collections::HashMap;

use balanced_zones_core::{GridCell, PlacedZone, Side, ZoneError};

/// Insertion-ordered record of every zone committed during a generation pass.
///
/// Records are addressed by their placement index; a secondary cell index
/// answers neighbour queries without scanning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    zones: Vec<PlacedZone>,
    by_cell: HashMap<GridCell, usize>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a zone and returns its placement index.
    ///
    /// Fails with [`ZoneError::DuplicatePlacement`] when the cell already holds
    /// a zone; the ledger is left untouched in that case.
    pub fn record(&mut self, zone: PlacedZone) -> Result<usize, ZoneError> {
        if self.by_cell.contains_key(&zone.cell) {
            return Err(ZoneError::DuplicatePlacement { cell: zone.cell });
        }
        let index = self.zones.len();
        let _ = self.by_cell.insert(zone.cell, index);
        self.zones.push(zone);
        Ok(index)
    }

    /// Zone committed at the provided placement index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedZone> {
        self.zones.get(index)
    }

    /// Zone occupying the provided cell.
    #[must_use]
    pub fn at(&self, cell: GridCell) -> Option<&PlacedZone> {
        self.by_cell.get(&cell).and_then(|index| self.zones.get(*index))
    }

    /// Zone sharing the given side of `cell`, if one has been placed.
    #[must_use]
    pub fn neighbour(&self, cell: GridCell, side: Side) -> Option<&PlacedZone> {
        cell.neighbour(side, u32::MAX, u32::MAX)
            .and_then(|neighbour| self.at(neighbour))
    }

    /// Every committed zone in placement order.
    #[must_use]
    pub fn zones(&self) -> &[PlacedZone] {
        &self.zones
    }

    /// Iterates over committed zones in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedZone> + '_ {
        self.zones.iter()
    }

    /// Number of committed zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Reports whether no zone has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Forgets every committed zone.
    pub fn clear(&mut self) {
        self.zones.clear();
        self.by_cell.clear();
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a PlacedZone;
    type IntoIter = std::slice::Iter<'a, PlacedZone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}
