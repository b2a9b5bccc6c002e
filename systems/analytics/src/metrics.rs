use balanced_zones_catalog::ZoneCatalog;
use balanced_zones_core::{Side, ZoneError};
use balanced_zones_level::Ledger;

/// Counts shared edges whose colours disagree.
///
/// Every pair of edge-adjacent zones is inspected once, through the East and
/// South sides of the western and northern zone respectively. Interior tiles
/// only match their West and South neighbours when placed, so the fixed North
/// and East boundary tiles can disagree with an exact match. Whitelists and
/// partial matches add further mismatches.
pub fn seam_mismatches(zones: &Ledger, catalog: &ZoneCatalog) -> Result<usize, ZoneError> {
    let mut mismatches = 0;
    for zone in zones {
        let definition = catalog.lookup(zone.tile)?;
        for side in [Side::East, Side::South] {
            let Some(neighbour) = zones.neighbour(zone.cell, side) else {
                continue;
            };
            let facing = catalog.lookup(neighbour.tile)?.edge(side.opposite());
            if definition.edge(side) != facing {
                mismatches += 1;
            }
        }
    }
    Ok(mismatches)
}

/// Arithmetic mean of the values, or zero when there are none.
pub fn mean<I>(values: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f32, 0_u32), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
