use balanced_zones_core::{EdgeColour, TileDefinition, TileId};
use serde::Deserialize;

use crate::{AdjacencyWhitelist, CatalogError, PerimeterRules, ZoneCatalog};

/// Catalog resource schema version understood by this build.
pub const SUPPORTED_CATALOG_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(default)]
    tiles: Vec<TileEntry>,
    perimeter: PerimeterEntry,
    #[serde(default)]
    whitelists: Vec<WhitelistEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileEntry {
    name: String,
    edges: [EdgeColour; 4],
    dispersion: f32,
    objects: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PerimeterEntry {
    top_left: Vec<String>,
    top_right: Vec<String>,
    bottom_right: Vec<String>,
    bottom_left: Vec<String>,
    north: String,
    east: String,
    south: String,
    west: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WhitelistEntry {
    neighbour: String,
    allowed: Vec<String>,
}

pub(crate) fn parse(contents: &str) -> Result<ZoneCatalog, CatalogError> {
    let manifest: Manifest = toml::from_str(contents)?;
    if manifest.version != SUPPORTED_CATALOG_VERSION {
        return Err(CatalogError::UnsupportedVersion {
            found: manifest.version,
            expected: SUPPORTED_CATALOG_VERSION,
        });
    }
    if manifest.tiles.is_empty() {
        return Err(CatalogError::Empty);
    }

    let tile_count = manifest.tiles.len();
    let mut tiles = Vec::with_capacity(tile_count);
    for (index, entry) in manifest.tiles.into_iter().enumerate() {
        let Some(id) = TileId::from_asset_name(&entry.name).filter(|id| id.index() == index) else {
            return Err(CatalogError::NonSequentialName {
                index,
                name: entry.name,
                expected: format!("WangTile{}", index + 1),
            });
        };
        tiles.push(TileDefinition::new(
            id,
            entry.edges,
            entry.dispersion,
            entry.objects,
        ));
    }

    let resolve = |name: &String| resolve_tile(name, tile_count);
    let resolve_all = |names: &Vec<String>| -> Result<Vec<TileId>, CatalogError> {
        names.iter().map(|name| resolve(name)).collect()
    };

    let perimeter = manifest.perimeter;
    let rules = PerimeterRules::new(
        [
            resolve_all(&perimeter.top_left)?,
            resolve_all(&perimeter.top_right)?,
            resolve_all(&perimeter.bottom_right)?,
            resolve_all(&perimeter.bottom_left)?,
        ],
        [
            resolve(&perimeter.north)?,
            resolve(&perimeter.east)?,
            resolve(&perimeter.south)?,
            resolve(&perimeter.west)?,
        ],
    );

    let mut whitelists = Vec::with_capacity(manifest.whitelists.len());
    for entry in &manifest.whitelists {
        whitelists.push(AdjacencyWhitelist::new(
            resolve(&entry.neighbour)?,
            resolve_all(&entry.allowed)?,
        ));
    }

    ZoneCatalog::new(tiles, rules, whitelists)
}

fn resolve_tile(name: &str, tile_count: usize) -> Result<TileId, CatalogError> {
    TileId::from_asset_name(name)
        .filter(|id| id.index() < tile_count)
        .ok_or_else(|| CatalogError::UnknownTile {
            name: name.to_owned(),
        })
}
