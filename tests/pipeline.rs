use std::collections::HashSet;

use hexgen::catalog::TagCatalog;
use hexgen::config::Params;
use hexgen::erosion::descent_path;
use hexgen::hex::neighbors;
use hexgen::{Bounds, HexMap, TerrainError};

fn scenario(seed: u32) -> Params {
    Params {
        seed,
        bounds: Bounds::Rect { width: 10, height: 10 },
        plates: 4,
        ocean: 0.5,
        max_elevation: 10000.0,
        ..Params::default()
    }
}

fn generated(params: Params) -> HexMap {
    let mut map = HexMap::new(params).expect("valid params");
    map.generate();
    map
}

fn classified(params: Params) -> HexMap {
    let mut map = generated(params);
    map.watershed(&TagCatalog::builtin()).expect("builtin catalog has every biome");
    map
}

#[test]
fn same_seed_gives_identical_maps() {
    let a = classified(scenario(42));
    let b = classified(scenario(42));
    assert_eq!(a.store().len(), b.store().len());
    for ((ha, ta), (hb, tb)) in a.store().iter().zip(b.store().iter()) {
        assert_eq!(ha, hb);
        assert_eq!(ta.elevation.map(f64::to_bits), tb.elevation.map(f64::to_bits));
        assert_eq!(ta.watershed, tb.watershed);
        assert_eq!(ta, tb);
    }
    assert_eq!(a.layers().base, b.layers().base);
}

#[test]
fn regenerating_resets_state() {
    let mut map = generated(scenario(42));
    let first: Vec<_> = map.store().iter().map(|(h, t)| (h, t.clone())).collect();
    map.generate();
    let second: Vec<_> = map.store().iter().map(|(h, t)| (h, t.clone())).collect();
    assert_eq!(first, second);
}

#[test]
fn different_seed_changes_plates() {
    let a = generated(scenario(42));
    let b = generated(scenario(43));
    let differs = a
        .store()
        .iter()
        .any(|(h, t)| b.store().get(h).map(|u| u.plate) != Some(t.plate));
    assert!(differs);
}

#[test]
fn plates_cover_bounds() {
    let params = scenario(42);
    let bounds = params.bounds;
    let map = generated(params);
    for h in bounds.coords() {
        let t = map.store().get(h).expect("in-bounds tile");
        assert!(t.plate.is_some());
        assert!(t.elevation.is_some());
    }
}

#[test]
fn descent_paths_never_repeat() {
    let map = generated(scenario(7));
    let store = map.store();
    for &h in store.coords() {
        let path = descent_path(store, h);
        let mut seen = HashSet::new();
        assert!(path.iter().all(|p| seen.insert(*p)));
        assert!(path.len() <= store.len());
    }
}

#[test]
fn watershed_partition_and_ridges() {
    for seed in [1, 42, 1234] {
        let mut map = HexMap::new(Params {
            seed,
            bounds: Bounds::Hexagon { radius: 9 },
            plates: 8,
            drops: 200,
            ..Params::default()
        })
        .unwrap();
        map.run(&TagCatalog::builtin()).unwrap();
        let store = map.store();

        for (h, t) in store.iter() {
            if t.is_land() {
                assert!(t.watershed.is_some(), "land at {} has no watershed", h);
            }
            let touches_other = neighbors(h).into_iter().any(|n| {
                store.watershed(n).is_some_and(|w| t.watershed.is_some_and(|own| own != w))
            });
            assert_eq!(t.is_divide(), touches_other, "divide mismatch at {}", h);
            assert!(!(t.is_river() && t.is_divide()));
            if t.is_shoreline() {
                assert!(t.elevation.unwrap() <= 0.0);
            }
            assert!(t.elevation.is_none() || t.biome.is_some());
        }
    }
}

#[test]
fn smoothing_never_widens_elevation_range() {
    let mut params = scenario(5);
    params.smooth = 0;
    let mut map = generated(params.clone());
    let (lo0, hi0) = map.store().range(|t| t.elevation).unwrap();

    params.smooth = 4;
    map = generated(params);
    let (lo4, hi4) = map.store().range(|t| t.elevation).unwrap();
    assert!(lo4 >= lo0 && hi4 <= hi0);
}

#[test]
fn erosion_is_repeatable_and_deterministic() {
    let run = || {
        let mut map = generated(scenario(42));
        map.erode();
        map.erode();
        map.store().iter().map(|(h, t)| (h, t.clone())).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_params_are_rejected() {
    let err = HexMap::new(Params { plates: 0, ..scenario(1) }).err();
    assert!(matches!(err, Some(TerrainError::NoPlates)));
    let err = HexMap::new(Params { bounds: Bounds::Rect { width: 0, height: 0 }, ..scenario(1) }).err();
    assert!(matches!(err, Some(TerrainError::InvalidBounds(_))));
}

#[test]
fn empty_catalog_fails_watershed() {
    let mut map = generated(scenario(42));
    let err = map.watershed(&TagCatalog::default()).unwrap_err();
    assert!(matches!(err, TerrainError::MissingTile(_)));
}

#[test]
fn failed_watershed_keeps_previous_classification() {
    let mut map = classified(scenario(42));
    let before: Vec<_> = map.store().iter().map(|(h, t)| (h, t.clone())).collect();
    let layers = map.layers().clone();

    assert!(map.watershed(&TagCatalog::default()).is_err());

    let after: Vec<_> = map.store().iter().map(|(h, t)| (h, t.clone())).collect();
    assert_eq!(before, after);
    assert_eq!(map.layers().base, layers.base);
    let with_biome = map.store().iter().filter(|(_, t)| t.biome.is_some()).count();
    assert_eq!(map.layers().base.len(), with_biome);
}
