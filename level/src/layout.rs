use balanced_zones_core::{Corner, GridCell, GridPosition, Placement, Side, Size2D, ZoneError};

/// Rectangular grid of zone cells laid over the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    origin: GridPosition,
    cell_size: f32,
    inset: f32,
    columns: u32,
    rows: u32,
}

impl GridLayout {
    /// Builds the grid covering `extents` from `start`, with cell centres
    /// inset by half a cell.
    pub fn new(extents: Size2D, start: GridPosition, cell_size: f32) -> Result<Self, ZoneError> {
        Self::with_inset(extents, start, cell_size, cell_size / 2.0)
    }

    /// Builds the grid with an explicit offset between a cell's origin and the
    /// position reported for it.
    pub fn with_inset(
        extents: Size2D,
        start: GridPosition,
        cell_size: f32,
        inset: f32,
    ) -> Result<Self, ZoneError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(invalid(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        if !inset.is_finite() {
            return Err(invalid(format!("inset must be finite, got {inset}")));
        }
        if !start.x().is_finite() || !start.y().is_finite() {
            return Err(invalid(format!(
                "start point must be finite, got ({}, {})",
                start.x(),
                start.y()
            )));
        }

        let columns = cell_count(extents.width(), cell_size, "width")?;
        let rows = cell_count(extents.height(), cell_size, "height")?;
        // A single row or column faces the wall on two opposite sides.
        if columns.min(rows) == 1 {
            return Err(invalid(format!(
                "a non-empty grid needs at least 2x2 cells, got {columns}x{rows}"
            )));
        }

        Ok(Self {
            origin: start,
            cell_size,
            inset,
            columns,
            rows,
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Offset between a cell's origin and its reported position.
    #[must_use]
    pub const fn inset(&self) -> f32 {
        self.inset
    }

    /// World position of the north-west corner of the grid.
    #[must_use]
    pub const fn origin(&self) -> GridPosition {
        self.origin
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::try_from(u64::from(self.columns) * u64::from(self.rows)).unwrap_or(usize::MAX)
    }

    /// Reports whether the grid holds no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// World position reported for a cell.
    #[must_use]
    pub fn position_of(&self, cell: GridCell) -> GridPosition {
        GridPosition::new(
            self.origin.x() + self.inset + cell.column() as f32 * self.cell_size,
            self.origin.y() + self.inset + cell.row() as f32 * self.cell_size,
        )
    }

    /// Cell whose reported position is exactly `position`.
    pub fn cell_at(&self, position: GridPosition) -> Result<GridCell, ZoneError> {
        let off_grid = ZoneError::PositionOffGrid {
            x: position.x(),
            y: position.y(),
        };
        let column = self.axis_index(position.x() - self.origin.x(), self.columns);
        let row = self.axis_index(position.y() - self.origin.y(), self.rows);
        let (Some(column), Some(row)) = (column, row) else {
            return Err(off_grid);
        };

        let cell = GridCell::new(column, row);
        if self.position_of(cell) == position {
            Ok(cell)
        } else {
            Err(off_grid)
        }
    }

    fn axis_index(&self, offset: f32, count: u32) -> Option<u32> {
        let index = ((offset - self.inset) / self.cell_size).round();
        (index.is_finite() && index >= 0.0 && index < count as f32).then_some(index as u32)
    }

    /// Positional category of a cell. Corners win over boundary sides, and
    /// boundary sides are checked North, East, South, West.
    #[must_use]
    pub fn classify(&self, cell: GridCell) -> Placement {
        let north = cell.row() == 0;
        let south = cell.row() + 1 == self.rows;
        let west = cell.column() == 0;
        let east = cell.column() + 1 == self.columns;

        match (north, east, south, west) {
            (true, _, _, true) => Placement::Corner(Corner::TopLeft),
            (true, true, _, _) => Placement::Corner(Corner::TopRight),
            (_, true, true, _) => Placement::Corner(Corner::BottomRight),
            (_, _, true, true) => Placement::Corner(Corner::BottomLeft),
            (true, _, _, _) => Placement::Boundary(Side::North),
            (_, true, _, _) => Placement::Boundary(Side::East),
            (_, _, true, _) => Placement::Boundary(Side::South),
            (_, _, _, true) => Placement::Boundary(Side::West),
            _ => Placement::Interior,
        }
    }

    /// Cell at the provided corner, or `None` for an empty grid.
    #[must_use]
    pub fn corner_cell(&self, corner: Corner) -> Option<GridCell> {
        if self.is_empty() {
            return None;
        }
        let last_column = self.columns - 1;
        let last_row = self.rows - 1;
        Some(match corner {
            Corner::TopLeft => GridCell::new(0, 0),
            Corner::TopRight => GridCell::new(last_column, 0),
            Corner::BottomRight => GridCell::new(last_column, last_row),
            Corner::BottomLeft => GridCell::new(0, last_row),
        })
    }

    /// Neighbouring cell inside the grid.
    #[must_use]
    pub fn neighbour(&self, cell: GridCell, side: Side) -> Option<GridCell> {
        cell.neighbour(side, self.columns, self.rows)
    }

    /// Cells in fill order: rows from the south edge toward the north edge,
    /// columns west to east within each row.
    pub fn raster_order(&self) -> impl Iterator<Item = GridCell> {
        let columns = self.columns;
        (0..self.rows)
            .rev()
            .flat_map(move |row| (0..columns).map(move |column| GridCell::new(column, row)))
    }
}

fn cell_count(extent: f32, cell_size: f32, axis: &str) -> Result<u32, ZoneError> {
    if !extent.is_finite() || extent < 0.0 {
        return Err(invalid(format!(
            "{axis} must be non-negative and finite, got {extent}"
        )));
    }
    let count = (extent / cell_size).floor();
    if count > u32::MAX as f32 {
        return Err(invalid(format!("{axis} spans too many cells ({count})")));
    }
    Ok(count as u32)
}

fn invalid(reason: String) -> ZoneError {
    ZoneError::InvalidLayout { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three() -> GridLayout {
        GridLayout::new(Size2D::new(300.0, 300.0), GridPosition::default(), 100.0)
            .expect("valid layout")
    }

    #[test]
    fn positions_are_inset_by_half_a_cell() {
        let layout = three_by_three();
        assert_eq!(
            layout.position_of(GridCell::new(0, 0)),
            GridPosition::new(50.0, 50.0)
        );
        assert_eq!(
            layout.position_of(GridCell::new(2, 1)),
            GridPosition::new(250.0, 150.0)
        );
    }

    #[test]
    fn cell_at_inverts_position_of() {
        let layout = GridLayout::new(
            Size2D::new(500.0, 400.0),
            GridPosition::new(-120.0, 30.0),
            100.0,
        )
        .expect("valid layout");
        for cell in layout.raster_order() {
            assert_eq!(layout.cell_at(layout.position_of(cell)), Ok(cell));
        }
    }

    #[test]
    fn cell_at_rejects_positions_between_centres() {
        let layout = three_by_three();
        assert_eq!(
            layout.cell_at(GridPosition::new(75.0, 50.0)),
            Err(ZoneError::PositionOffGrid { x: 75.0, y: 50.0 })
        );
        assert!(layout.cell_at(GridPosition::new(350.0, 50.0)).is_err());
        assert!(layout.cell_at(GridPosition::new(-50.0, 50.0)).is_err());
    }

    #[test]
    fn partial_cells_are_dropped() {
        let layout = GridLayout::new(Size2D::new(350.0, 299.0), GridPosition::default(), 100.0)
            .expect("valid layout");
        assert_eq!((layout.columns(), layout.rows()), (3, 2));
    }

    #[test]
    fn single_row_or_column_is_rejected() {
        let origin = GridPosition::default();
        for extents in [
            Size2D::new(300.0, 100.0),
            Size2D::new(100.0, 500.0),
            Size2D::new(100.0, 100.0),
        ] {
            assert!(matches!(
                GridLayout::new(extents, origin, 100.0),
                Err(ZoneError::InvalidLayout { .. })
            ));
        }
        assert!(GridLayout::new(Size2D::new(200.0, 200.0), origin, 100.0).is_ok());
        assert!(GridLayout::new(Size2D::new(0.0, 100.0), origin, 100.0).is_ok());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let extents = Size2D::new(300.0, 300.0);
        let origin = GridPosition::default();
        for cell_size in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                GridLayout::new(extents, origin, cell_size),
                Err(ZoneError::InvalidLayout { .. })
            ));
        }
        assert!(GridLayout::new(Size2D::new(-1.0, 300.0), origin, 100.0).is_err());
        assert!(GridLayout::new(Size2D::new(300.0, f32::NAN), origin, 100.0).is_err());
    }

    #[test]
    fn classification_covers_ring_and_interior() {
        let layout = three_by_three();
        let expected = [
            (GridCell::new(0, 0), Placement::Corner(Corner::TopLeft)),
            (GridCell::new(1, 0), Placement::Boundary(Side::North)),
            (GridCell::new(2, 0), Placement::Corner(Corner::TopRight)),
            (GridCell::new(0, 1), Placement::Boundary(Side::West)),
            (GridCell::new(1, 1), Placement::Interior),
            (GridCell::new(2, 1), Placement::Boundary(Side::East)),
            (GridCell::new(0, 2), Placement::Corner(Corner::BottomLeft)),
            (GridCell::new(1, 2), Placement::Boundary(Side::South)),
            (GridCell::new(2, 2), Placement::Corner(Corner::BottomRight)),
        ];
        for (cell, placement) in expected {
            assert_eq!(layout.classify(cell), placement, "{cell:?}");
        }
    }

    #[test]
    fn raster_order_starts_at_the_south_west_cell() {
        let layout = three_by_three();
        let order: Vec<(u32, u32)> = layout
            .raster_order()
            .map(|cell| (cell.column(), cell.row()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 2),
                (1, 2),
                (2, 2),
                (0, 1),
                (1, 1),
                (2, 1),
                (0, 0),
                (1, 0),
                (2, 0)
            ]
        );
    }

    #[test]
    fn corner_cells_follow_extents() {
        let layout = GridLayout::new(
            Size2D::new(400.0, 300.0),
            GridPosition::new(1000.0, 0.0),
            100.0,
        )
        .expect("valid layout");
        let corner_position =
            |corner| layout.corner_cell(corner).map(|cell| layout.position_of(cell));
        assert_eq!(
            corner_position(Corner::TopLeft),
            Some(GridPosition::new(1050.0, 50.0))
        );
        assert_eq!(
            corner_position(Corner::BottomRight),
            Some(GridPosition::new(1350.0, 250.0))
        );

        let empty = GridLayout::new(Size2D::new(0.0, 300.0), GridPosition::default(), 100.0)
            .expect("valid layout");
        assert!(empty.is_empty());
        assert_eq!(empty.corner_cell(Corner::TopLeft), None);
        assert_eq!(empty.raster_order().count(), 0);
    }
}
