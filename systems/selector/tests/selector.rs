use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{
    Coefficients, Corner, EdgeColour, GridCell, GridPosition, PlacedZone, Placement,
    SelectionStrategy, Side, Size2D, TileId, ZoneError,
};
use balanced_zones_level::{GridLayout, Ledger};
use balanced_zones_system_selector::{
    ColourDrift, DispersionPreference, EdgeConstraints, SelectorConfig, TieBreak, TileSelector,
};

fn layout(columns: u32, rows: u32) -> GridLayout {
    GridLayout::new(
        Size2D::new(columns as f32 * 100.0, rows as f32 * 100.0),
        GridPosition::default(),
        100.0,
    )
    .expect("valid layout")
}

fn fill(selector: &mut TileSelector, layout: &GridLayout) -> Ledger {
    let mut ledger = Ledger::new();
    for cell in layout.raster_order() {
        let _ = selector
            .place(cell, layout, &mut ledger)
            .expect("standard catalog fills every cell");
    }
    ledger
}

fn seed_zone(ledger: &mut Ledger, layout: &GridLayout, tile: u8, cell: GridCell) {
    let _ = ledger
        .record(PlacedZone {
            tile: TileId::new(tile),
            cell,
            position: layout.position_of(cell),
            placement: layout.classify(cell),
            strategy: SelectionStrategy::Unconstrained,
            coefficients: Coefficients::default(),
        })
        .expect("unique cell");
}

fn ids(values: &[u8]) -> Vec<TileId> {
    values.iter().copied().map(TileId::new).collect()
}

#[test]
fn three_by_three_interior_matches_both_neighbours() {
    let catalog = ZoneCatalog::standard();
    let layout = layout(3, 3);

    for seed in 0..16 {
        let mut selector = TileSelector::new(catalog.clone(), SelectorConfig::default(), seed);
        let ledger = fill(&mut selector, &layout);
        assert_eq!(ledger.len(), 9);

        let centre = ledger.at(GridCell::new(1, 1)).expect("interior placed");
        assert_eq!(centre.placement, Placement::Interior);
        assert_eq!(centre.strategy, SelectionStrategy::ExactMatch);

        let tile = catalog.lookup(centre.tile).expect("known tile");
        let west = ledger.at(GridCell::new(0, 1)).expect("west placed");
        let south = ledger.at(GridCell::new(1, 2)).expect("south placed");
        let west_edge = catalog.lookup(west.tile).expect("known tile").edge(Side::East);
        let south_edge = catalog.lookup(south.tile).expect("known tile").edge(Side::North);
        assert_eq!(tile.edge(Side::West), west_edge);
        assert_eq!(tile.edge(Side::South), south_edge);
    }
}

#[test]
fn perimeter_is_walled_and_corners_use_their_sets() {
    let catalog = ZoneCatalog::standard();
    let layout = layout(6, 5);
    let mut selector = TileSelector::new(catalog.clone(), SelectorConfig::default(), 77);
    let ledger = fill(&mut selector, &layout);

    for zone in &ledger {
        let definition = catalog.lookup(zone.tile).expect("known tile");
        match zone.placement {
            Placement::Corner(corner) => {
                assert!(catalog
                    .perimeter()
                    .corner_candidates(corner)
                    .contains(&zone.tile));
                for side in corner.outward_sides() {
                    assert!(definition.edge(side).is_wall());
                }
            }
            Placement::Boundary(side) => {
                assert_eq!(zone.strategy, SelectionStrategy::BoundaryTile);
                assert!(definition.edge(side).is_wall(), "{:?}", zone.cell);
            }
            Placement::Interior => {
                assert_ne!(zone.strategy, SelectionStrategy::PartialMatch);
            }
        }
    }
}

#[test]
fn corner_choices_follow_the_fill_order() {
    let layout = layout(3, 3);
    let mut selector = TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), 3);
    let ledger = fill(&mut selector, &layout);

    let expected = [
        (Corner::BottomLeft, 5),
        (Corner::BottomRight, 4),
        (Corner::TopLeft, 2),
        (Corner::TopRight, 3),
    ];
    for (corner, tile) in expected {
        let cell = layout.corner_cell(corner).expect("non-empty grid");
        assert_eq!(
            ledger.at(cell).map(|zone| zone.tile),
            Some(TileId::new(tile)),
            "{corner:?}"
        );
    }
}

#[test]
fn corridor_neighbour_triggers_whitelist() {
    let layout = layout(3, 3);
    let allowed = ids(&[2, 3, 5, 6, 8, 9, 10, 13]);

    for seed in 0..32 {
        let mut selector =
            TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), seed);
        let mut ledger = Ledger::new();
        seed_zone(&mut ledger, &layout, 1, GridCell::new(0, 1));
        seed_zone(&mut ledger, &layout, 20, GridCell::new(1, 2));

        let tile = selector
            .place(GridCell::new(1, 1), &layout, &mut ledger)
            .expect("whitelist is non-empty");
        assert!(allowed.contains(&tile), "{tile} not whitelisted");
        assert_eq!(
            ledger.at(GridCell::new(1, 1)).map(|zone| zone.strategy),
            Some(SelectionStrategy::Whitelist)
        );
    }
}

#[test]
fn both_whitelists_intersect() {
    let layout = layout(3, 3);
    let allowed = ids(&[3, 5, 10]);

    for seed in 0..32 {
        let mut selector =
            TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), seed);
        let mut ledger = Ledger::new();
        seed_zone(&mut ledger, &layout, 1, GridCell::new(0, 1));
        seed_zone(&mut ledger, &layout, 9, GridCell::new(1, 2));

        let selection = selector
            .select(GridCell::new(1, 1), &layout, &ledger)
            .expect("intersection is non-empty");
        assert!(allowed.contains(&selection.tile));
    }
}

#[test]
fn isolated_interior_cell_draws_from_the_whole_catalog() {
    let layout = layout(3, 3);
    let mut selector = TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), 11);

    let selection = selector
        .select(GridCell::new(1, 1), &layout, &Ledger::new())
        .expect("catalog is non-empty");
    assert_eq!(selection.strategy, SelectionStrategy::Unconstrained);
    assert!(selection.tile.index() < selector.catalog().len());
}

#[test]
fn balanced_tie_break_targets_defensiveness() {
    let layout = layout(3, 3);
    let open = ids(&[6, 8, 14, 15, 16]);
    let walled = ids(&[0, 7, 10, 17]);

    for seed in 0..16 {
        for (target, expected) in [(0.0, &open), (100.0, &walled)] {
            let config = SelectorConfig {
                tie_break: TieBreak::Balanced {
                    target_defensiveness: target,
                    dispersion: DispersionPreference::Any,
                },
                ..SelectorConfig::default()
            };
            let mut selector = TileSelector::new(ZoneCatalog::standard(), config, seed);
            let selection = selector
                .select(GridCell::new(1, 1), &layout, &Ledger::new())
                .expect("catalog is non-empty");
            assert!(expected.contains(&selection.tile), "{} for {target}", selection.tile);
        }
    }
}

fn balanced(target_defensiveness: f32, dispersion: DispersionPreference) -> SelectorConfig {
    SelectorConfig {
        tie_break: TieBreak::Balanced {
            target_defensiveness,
            dispersion,
        },
        ..SelectorConfig::default()
    }
}

#[test]
fn balanced_tie_break_favours_the_preferred_dispersion() {
    let layout = layout(3, 3);
    let corner_pieces = ids(&[2, 3, 4, 5]);
    // Half-even tiles with one wall score 3.0; those with two walls score 3.5.
    let single_wall_half_even = ids(&[11, 12, 18, 19, 20, 21]);

    for seed in 0..16 {
        for (dispersion, target, expected) in [
            (DispersionPreference::CornerPiece, 100.0, &corner_pieces),
            (DispersionPreference::HalfEven, 0.0, &single_wall_half_even),
        ] {
            let config = balanced(target, dispersion);
            let mut selector = TileSelector::new(ZoneCatalog::standard(), config, seed);
            let selection = selector
                .select(GridCell::new(1, 1), &layout, &Ledger::new())
                .expect("catalog is non-empty");
            assert!(expected.contains(&selection.tile), "{}", selection.tile);

            let definition = selector
                .catalog()
                .lookup(selection.tile)
                .expect("catalog tile");
            assert!(dispersion.accepts(definition));
        }
    }
}

#[test]
fn unmatched_dispersion_preference_falls_back_to_every_candidate() {
    // Only WangTile12 and WangTile17 show Green on both their West and South
    // edges, and neither is a corner piece.
    let constraints = EdgeConstraints::new()
        .with(Side::West, EdgeColour::Green)
        .with(Side::South, EdgeColour::Green);

    for seed in 0..16 {
        let config = balanced(0.0, DispersionPreference::CornerPiece);
        let mut selector = TileSelector::new(ZoneCatalog::standard(), config, seed);
        let selection = selector
            .select_with_constraints(GridCell::new(1, 1), &constraints)
            .expect("exact matches exist");
        assert_eq!(selection.strategy, SelectionStrategy::ExactMatch);
        assert_eq!(selection.tile, TileId::new(16));
    }
}

#[test]
fn drift_prefers_colours_on_open_sides() {
    let config = SelectorConfig {
        drift: ColourDrift {
            enabled: true,
            grey: 1,
            red: 0,
            green: 0,
            blue: 0,
        },
        ..SelectorConfig::default()
    };
    let mut selector = TileSelector::new(ZoneCatalog::standard(), config, 5);

    let unconstrained = selector
        .select_with_constraints(GridCell::new(1, 1), &EdgeConstraints::new())
        .expect("catalog is non-empty");
    assert_eq!(unconstrained.tile, TileId::new(15));

    let constrained = EdgeConstraints::new()
        .with(Side::West, EdgeColour::Green)
        .with(Side::South, EdgeColour::Green);
    let selection = selector
        .select_with_constraints(GridCell::new(1, 1), &constrained)
        .expect("exact match exists");
    assert_eq!(selection.tile, TileId::new(11));
    assert_eq!(selection.strategy, SelectionStrategy::ExactMatch);
}

#[test]
fn same_seed_repeats_the_same_tiles() {
    let layout = layout(8, 6);
    let run = |seed| {
        let mut selector =
            TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), seed);
        fill(&mut selector, &layout)
            .iter()
            .map(|zone| zone.tile)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn committing_twice_is_rejected() {
    let layout = layout(3, 3);
    let mut selector = TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), 0);
    let mut ledger = Ledger::new();
    let cell = GridCell::new(1, 2);

    let _ = selector.place(cell, &layout, &mut ledger).expect("first commit");
    assert_eq!(
        selector.place(cell, &layout, &mut ledger),
        Err(ZoneError::DuplicatePlacement { cell })
    );
    assert_eq!(ledger.len(), 1);
}

#[test]
fn positions_must_be_cell_centres() {
    let layout = layout(3, 3);
    let mut selector = TileSelector::new(ZoneCatalog::standard(), SelectorConfig::default(), 0);
    let mut ledger = Ledger::new();

    assert_eq!(
        selector.place_at(GridPosition::new(150.0, 250.0), &layout, &mut ledger),
        Ok(TileId::new(20))
    );
    assert_eq!(
        selector.place_at(GridPosition::new(160.0, 250.0), &layout, &mut ledger),
        Err(ZoneError::PositionOffGrid { x: 160.0, y: 250.0 })
    );
}
