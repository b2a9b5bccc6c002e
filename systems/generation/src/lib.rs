#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid-fill driver that turns a play-area description into committed zones.
//!
//! Cells are visited from the south row toward the north row and from west to
//! east inside each row, so every interior cell already has its West and South
//! neighbours in place when it is selected. Each committed tile is forwarded
//! to a spawner callback that materialises it outside this crate.

use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{GridPosition, PlacedZone, Size2D, TileId, ZoneError};
use balanced_zones_level::{GridLayout, Ledger};
use balanced_zones_system_selector::{SelectorConfig, TileSelector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Outcome of one generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    layout: GridLayout,
    zones: Ledger,
}

impl GeneratedLevel {
    /// Grid the zones were placed on.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Ledger holding every committed zone in placement order.
    #[must_use]
    pub fn zones(&self) -> &Ledger {
        &self.zones
    }

    /// Tile and position of every committed zone in placement order.
    #[must_use]
    pub fn placements(&self) -> Vec<(TileId, GridPosition)> {
        self.zones
            .iter()
            .map(|zone| (zone.tile, zone.position))
            .collect()
    }

    /// Zones of one grid row, west to east.
    pub fn row(&self, row: u32) -> impl Iterator<Item = &PlacedZone> + '_ {
        self.zones.iter().filter(move |zone| zone.cell.row() == row)
    }
}

/// Owns a tile selector and the ledger it fills.
#[derive(Debug)]
pub struct LevelGenerator<R = ChaCha8Rng> {
    selector: TileSelector<R>,
    ledger: Ledger,
}

impl LevelGenerator<ChaCha8Rng> {
    /// Creates a generator seeded once from `seed`.
    #[must_use]
    pub fn new(catalog: ZoneCatalog, config: SelectorConfig, seed: u64) -> Self {
        Self::with_selector(TileSelector::new(catalog, config, seed))
    }

    /// Generator over the standard catalog with default selection rules.
    #[must_use]
    pub fn standard(seed: u64) -> Self {
        Self::new(ZoneCatalog::standard(), SelectorConfig::default(), seed)
    }
}

impl<R: Rng> LevelGenerator<R> {
    /// Wraps an already configured selector.
    #[must_use]
    pub fn with_selector(selector: TileSelector<R>) -> Self {
        Self {
            selector,
            ledger: Ledger::new(),
        }
    }

    /// Selector driving the generator.
    #[must_use]
    pub fn selector(&self) -> &TileSelector<R> {
        &self.selector
    }

    /// Zones of the pass in progress. Empty between runs.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Fills the play area described by `extents`, `start` and `cell_size`,
    /// invoking `spawner` once per committed zone.
    pub fn generate<F>(
        &mut self,
        extents: Size2D,
        start: GridPosition,
        cell_size: f32,
        spawner: F,
    ) -> Result<GeneratedLevel, ZoneError>
    where
        F: FnMut(TileId, GridPosition),
    {
        let layout = GridLayout::new(extents, start, cell_size)?;
        self.generate_layout(layout, spawner)
    }

    /// Fills a prepared layout, invoking `spawner` once per committed zone.
    ///
    /// The internal ledger is cleared first and moved into the returned level
    /// once every cell is committed. The first failure aborts the pass.
    pub fn generate_layout<F>(
        &mut self,
        layout: GridLayout,
        mut spawner: F,
    ) -> Result<GeneratedLevel, ZoneError>
    where
        F: FnMut(TileId, GridPosition),
    {
        self.ledger.clear();
        log::info!(
            "filling {}x{} zone grid ({} cells of {} units)",
            layout.columns(),
            layout.rows(),
            layout.cell_count(),
            layout.cell_size()
        );

        for cell in layout.raster_order() {
            let tile = self.selector.place(cell, &layout, &mut self.ledger)?;
            spawner(tile, layout.position_of(cell));
        }

        let zones = std::mem::take(&mut self.ledger);
        log::info!("generation pass committed {} zones", zones.len());
        Ok(GeneratedLevel { layout, zones })
    }
}

/// Fills a level over the standard catalog with a freshly drawn seed and
/// returns every `(tile, position)` pair in placement order.
pub fn generate(
    extents: Size2D,
    start: GridPosition,
    cell_size: f32,
) -> Result<Vec<(TileId, GridPosition)>, ZoneError> {
    let selector = TileSelector::with_rng(
        ZoneCatalog::standard(),
        SelectorConfig::default(),
        ChaCha8Rng::from_entropy(),
    );
    collect(LevelGenerator::with_selector(selector), extents, start, cell_size)
}

/// Same as [`generate`] with a caller-provided seed.
pub fn generate_seeded(
    extents: Size2D,
    start: GridPosition,
    cell_size: f32,
    seed: u64,
) -> Result<Vec<(TileId, GridPosition)>, ZoneError> {
    collect(LevelGenerator::standard(seed), extents, start, cell_size)
}

fn collect<R: Rng>(
    mut generator: LevelGenerator<R>,
    extents: Size2D,
    start: GridPosition,
    cell_size: f32,
) -> Result<Vec<(TileId, GridPosition)>, ZoneError> {
    let mut spawned = Vec::new();
    let _ = generator.generate(extents, start, cell_size, |tile, position| {
        spawned.push((tile, position));
    })?;
    Ok(spawned)
}
