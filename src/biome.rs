use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::catalog::{TileCatalog, TileRef};
use crate::config::Params;
use crate::error::TerrainError;
use crate::hex::{Hex, neighbors};
use crate::store::{TileRecord, TileStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Mountain,
    Hills,
    ShallowWater,
    DeepWater,
    River,
    Swamp,
    Grassland,
}

impl Biome {
    /// Catalog tags of the base-layer tile.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Biome::Mountain => &["mountains"],
            Biome::Hills => &["rocky hills"],
            Biome::ShallowWater => &["shallow water"],
            Biome::DeepWater => &["deep water"],
            Biome::Swamp => &["swamp", "wet"],
            Biome::River | Biome::Grassland => &["grassland"],
        }
    }

    const BASE: [Biome; 6] = [
        Biome::Mountain,
        Biome::Hills,
        Biome::ShallowWater,
        Biome::DeepWater,
        Biome::Swamp,
        Biome::Grassland,
    ];
}

/// First matching rule wins. `max_flow` is the largest `water` value on the map.
pub fn classify(t: &TileRecord, params: &Params, max_flow: f64) -> Option<Biome> {
    let e = t.elevation?;
    let biome = if e >= params.mountain_elevation {
        Biome::Mountain
    } else if t.is_divide() && e >= params.divide_mountain_elevation {
        Biome::Mountain
    } else if t.is_divide() {
        Biome::Hills
    } else if t.is_shoreline() {
        Biome::ShallowWater
    } else if e <= 0.0 && e >= -params.shallow_depth {
        Biome::ShallowWater
    } else if e <= 0.0 {
        Biome::DeepWater
    } else if t.is_river() {
        Biome::River
    } else if t.water.unwrap_or(0.0) > params.swamp_fraction * max_flow {
        Biome::Swamp
    } else {
        Biome::Grassland
    };
    Some(biome)
}

/// Two tile layers ready for rendering: base terrain and river edges on top.
#[derive(Clone, Debug, Default)]
pub struct TileLayers {
    pub base: BTreeMap<Hex, TileRef>,
    pub edges: BTreeMap<Hex, TileRef>,
}

/// Direction indices of river neighbors, joined: "035".
pub fn river_edge_tag(store: &TileStore, h: Hex) -> String {
    neighbors(h)
        .into_iter()
        .enumerate()
        .filter(|(_, n)| store.get(*n).is_some_and(|t| t.is_river()))
        .map(|(i, _)| char::from(b'0' + i as u8))
        .collect()
}

/// Resolved base-layer tiles, one per biome.
#[derive(Clone, Debug)]
pub struct BaseTiles(HashMap<Biome, TileRef>);

impl BaseTiles {
    /// Looks up every base tile. A missing one is a configuration error.
    pub fn resolve(catalog: &impl TileCatalog) -> Result<Self, TerrainError> {
        let mut tiles = HashMap::new();
        for b in Biome::BASE {
            tiles.insert(b, catalog.require(b.tags())?);
        }
        Ok(Self(tiles))
    }

    /// River cells sit on grassland.
    pub fn get(&self, biome: Biome) -> TileRef {
        let b = if biome == Biome::River { Biome::Grassland } else { biome };
        self.0[&b]
    }
}

/// Classify every coordinate with an elevation, write its biome into the
/// store and lay down tiles from `base` and `catalog`.
///
/// A river-edge variant that the catalog lacks leaves that cell's edge unset.
pub fn paint(
    store: &mut TileStore,
    base: &BaseTiles,
    catalog: &impl TileCatalog,
    params: &Params,
) -> TileLayers {
    let max_flow = store.range(|t| t.water).map_or(0.0, |(_, hi)| hi.max(0.0));
    let classified: Vec<Option<Biome>> = store
        .iter()
        .map(|(_, t)| classify(t, params, max_flow))
        .collect();

    let mut layers = TileLayers::default();
    let mut misses = 0usize;
    for (&h, biome) in store.coords().iter().zip(&classified) {
        let Some(biome) = *biome else {
            continue;
        };
        layers.base.insert(h, base.get(biome));
        if biome != Biome::River {
            continue;
        }
        let tag = river_edge_tag(store, h);
        match catalog.find(&["river", tag.as_str()]) {
            Some(tile) if !tag.is_empty() => {
                layers.edges.insert(h, tile);
            }
            _ => misses += 1,
        }
    }

    for ((_, t), biome) in store.iter_mut().zip(classified) {
        t.biome = biome;
    }

    if misses > 0 {
        log::warn!("{} river cells had no matching edge tile", misses);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TagCatalog;

    fn rec(elevation: f64) -> TileRecord {
        TileRecord { elevation: Some(elevation), ..TileRecord::default() }
    }

    fn paint_with(store: &mut TileStore, catalog: &TagCatalog) -> TileLayers {
        let base = BaseTiles::resolve(catalog).unwrap();
        paint(store, &base, catalog, &Params::default())
    }

    #[test]
    fn priority_order() {
        let p = Params::default();
        let c = |t: &TileRecord| classify(t, &p, 10.0);

        assert_eq!(c(&rec(8000.0)), Some(Biome::Mountain));
        assert_eq!(c(&TileRecord { divide: Some(true), ..rec(6000.0) }), Some(Biome::Mountain));
        assert_eq!(c(&TileRecord { divide: Some(true), ..rec(100.0) }), Some(Biome::Hills));
        assert_eq!(
            c(&TileRecord { divide: Some(true), shoreline: Some(true), ..rec(-10.0) }),
            Some(Biome::Hills)
        );
        assert_eq!(c(&TileRecord { shoreline: Some(true), ..rec(-5000.0) }), Some(Biome::ShallowWater));
        assert_eq!(c(&rec(-1500.0)), Some(Biome::ShallowWater));
        assert_eq!(c(&rec(-2500.0)), Some(Biome::DeepWater));
        assert_eq!(
            c(&TileRecord { river: Some(true), water: Some(100.0), ..rec(50.0) }),
            Some(Biome::River)
        );
        assert_eq!(c(&TileRecord { water: Some(8.0), ..rec(50.0) }), Some(Biome::Swamp));
        assert_eq!(c(&TileRecord { water: Some(6.0), ..rec(50.0) }), Some(Biome::Grassland));
        assert_eq!(c(&TileRecord::default()), None);
    }

    #[test]
    fn missing_base_tile_is_fatal() {
        let mut catalog = TagCatalog::builtin();
        catalog.entries.retain(|e| !e.tags.iter().any(|t| t == "deep water"));
        let err = BaseTiles::resolve(&catalog).unwrap_err();
        assert!(matches!(err, TerrainError::MissingTile(_)));
        assert!(BaseTiles::resolve(&TagCatalog::builtin()).is_ok());
    }

    #[test]
    fn river_edges_follow_neighbors() {
        let mut store = TileStore::new();
        for q in 0..3 {
            let t = store.entry(Hex::new(q, 0));
            t.elevation = Some(100.0);
            t.river = Some(true);
        }
        let layers = paint_with(&mut store, &TagCatalog::builtin());
        assert_eq!(river_edge_tag(&store, Hex::new(1, 0)), "14");
        assert_eq!(layers.base.len(), 3);
        assert_eq!(layers.edges.len(), 3);
        assert_eq!(layers.edges[&Hex::new(1, 0)], TagCatalog::builtin().find(&["river", "14"]).unwrap());
        assert_eq!(store.get(Hex::new(0, 0)).unwrap().biome, Some(Biome::River));
    }

    #[test]
    fn missing_edge_variant_leaves_cell_unset() {
        let mut store = TileStore::new();
        for q in 0..2 {
            let t = store.entry(Hex::new(q, 0));
            t.elevation = Some(100.0);
            t.river = Some(true);
        }
        let mut catalog = TagCatalog::builtin();
        catalog.entries.retain(|e| !e.tags.iter().any(|t| t == "4"));
        let layers = paint_with(&mut store, &catalog);
        assert!(!layers.edges.contains_key(&Hex::new(0, 0)));
        assert!(layers.edges.contains_key(&Hex::new(1, 0)));
        assert_eq!(layers.base.len(), 2);
    }

    #[test]
    fn lone_river_cell_gets_no_edge() {
        let mut store = TileStore::new();
        let t = store.entry(Hex::new(0, 0));
        t.elevation = Some(100.0);
        t.river = Some(true);
        let layers = paint_with(&mut store, &TagCatalog::builtin());
        assert!(layers.edges.is_empty());
        assert_eq!(layers.base[&Hex::new(0, 0)], TileRef { x: 0, y: 0 });
    }
}
