use std::collections::HashSet;

use crate::config::Params;
use crate::elevation::{compute_gradient, smooth};
use crate::hex::{Hex, neighbors};
use crate::rng::Rng;
use crate::store::TileStore;

/// Steepest-descent path from `start`, without touching the store.
///
/// Each step moves to the lowest unvisited neighbor whose elevation is not
/// above the current one; ties go to the first in canonical direction order.
/// The walk stops at sea level (elevation <= 0) or when no such neighbor
/// exists. The last element is the terminal coordinate.
pub fn descent_path(store: &TileStore, start: Hex) -> Vec<Hex> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    let mut cur = start;
    loop {
        path.push(cur);
        visited.insert(cur);
        let e = match store.elevation(cur) {
            Some(e) if e > 0.0 => e,
            _ => break,
        };

        let mut best: Option<(Hex, f64)> = None;
        for n in neighbors(cur) {
            if visited.contains(&n) {
                continue;
            }
            let Some(ne) = store.elevation(n) else {
                continue;
            };
            if ne > e {
                continue;
            }
            if best.is_none_or(|(_, be)| ne < be) {
                best = Some((n, ne));
            }
        }

        match best {
            Some((n, _)) => cur = n,
            None => break,
        }
    }
    path
}

/// Walk a descent from `start` and carve it.
///
/// Every coordinate before the terminal gives up `erosion_rate` of its
/// elevation to the carried sediment; the terminal receives
/// `deposition_rate` of the load, but never rises above its eroded
/// predecessor. Flow is tallied into `water` along the way and the drop's
/// rain into `precipitation` at the start.
pub fn erode_path(store: &mut TileStore, start: Hex, params: &Params) -> Vec<Hex> {
    let path = descent_path(store, start);

    let rain = store.entry(start);
    rain.precipitation = Some(rain.precipitation.unwrap_or(0.0) + 1.0);

    for (i, &h) in path.iter().enumerate() {
        let t = store.entry(h);
        t.water = Some(t.water.unwrap_or(0.0) + ((i + 1) as f64).ln());
    }

    let Some((&terminal, body)) = path.split_last() else {
        return path;
    };
    if body.is_empty() {
        return path;
    }

    let mut sediment = 0.0;
    let mut last = f64::INFINITY;
    for &h in body {
        let Some(t) = store.get_mut(h) else {
            continue;
        };
        let Some(e) = t.elevation else {
            continue;
        };
        let carried = e * params.erosion_rate;
        sediment += carried;
        last = e - carried;
        t.elevation = Some(last);
    }

    let t = store.entry(terminal);
    if let Some(e) = t.elevation {
        t.elevation = Some((e + sediment * params.deposition_rate).min(last));
    }
    path
}

/// `params.drops` hydraulic paths from random land coordinates, then one
/// smoothing pass and a fresh gradient field.
///
/// Candidates are the coordinates that are land when the pass starts.
pub fn erode(store: &mut TileStore, params: &Params, rng: &mut Rng) {
    let land: Vec<Hex> = store
        .iter()
        .filter(|(_, t)| t.is_land())
        .map(|(h, _)| h)
        .collect();

    if land.is_empty() {
        log::info!("erosion skipped: no land");
    } else {
        let mut total_len = 0usize;
        for _ in 0..params.drops {
            let start = land[rng.range_usize(land.len())];
            total_len += erode_path(store, start, params).len();
        }
        log::debug!(
            "eroded {} drops over {} land tiles, mean path {:.1}",
            params.drops,
            land.len(),
            total_len as f64 / params.drops.max(1) as f64
        );
    }

    smooth(store);
    compute_gradient(store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Bounds;

    /// Cone peaking at the origin, sea beyond `radius - 1`.
    fn cone(radius: u32) -> TileStore {
        let mut store = TileStore::new();
        for h in (Bounds::Hexagon { radius }).coords() {
            let d = h.distance(Hex::new(0, 0)) as f64;
            store.entry(h).elevation = Some(1000.0 * (radius as f64 - 1.0 - d));
        }
        store
    }

    #[test]
    fn descent_reaches_sea_without_repeats() {
        let store = cone(5);
        let path = descent_path(&store, Hex::new(0, 0));
        let mut seen = HashSet::new();
        assert!(path.iter().all(|h| seen.insert(*h)));
        assert!(path.len() <= store.len());
        assert!(store.elevation(*path.last().unwrap()).unwrap() <= 0.0);
        for w in path.windows(2) {
            assert!(store.elevation(w[1]).unwrap() <= store.elevation(w[0]).unwrap());
        }
    }

    #[test]
    fn descent_from_sea_is_single_step() {
        let store = cone(3);
        let sea = Hex::new(2, 0);
        assert_eq!(descent_path(&store, sea), vec![sea]);
        assert_eq!(descent_path(&store, Hex::new(50, 50)), vec![Hex::new(50, 50)]);
    }

    #[test]
    fn ties_take_first_canonical_direction() {
        let mut store = TileStore::new();
        store.entry(Hex::new(0, 0)).elevation = Some(10.0);
        for n in neighbors(Hex::new(0, 0)) {
            store.entry(n).elevation = Some(-1.0);
        }
        let path = descent_path(&store, Hex::new(0, 0));
        assert_eq!(path, vec![Hex::new(0, 0), Hex::new(-1, 1)]);
    }

    #[test]
    fn flat_plateau_terminates() {
        let mut store = TileStore::new();
        for h in (Bounds::Hexagon { radius: 4 }).coords() {
            store.entry(h).elevation = Some(50.0);
        }
        let path = descent_path(&store, Hex::new(0, 0));
        let mut seen = HashSet::new();
        assert!(path.iter().all(|h| seen.insert(*h)));
        assert!(path.len() <= store.len());
    }

    #[test]
    fn committed_path_lowers_land_and_tracks_water() {
        let mut store = cone(5);
        let params = Params { erosion_rate: 0.1, ..Params::default() };
        let before = store.clone();
        let path = erode_path(&mut store, Hex::new(0, 0), &params);
        let (terminal, body) = path.split_last().unwrap();
        for h in body {
            let (b, a) = (before.elevation(*h).unwrap(), store.elevation(*h).unwrap());
            assert!(a < b && a > 0.0);
        }
        assert!(store.elevation(*terminal).unwrap() >= before.elevation(*terminal).unwrap());
        assert_eq!(store.get(Hex::new(0, 0)).unwrap().precipitation, Some(1.0));
        assert_eq!(store.get(path[1]).unwrap().water, Some(2f64.ln()));
    }

    #[test]
    fn deposition_stops_at_eroded_predecessor() {
        let mut store = TileStore::new();
        store.entry(Hex::new(0, 0)).elevation = Some(100.0);
        store.entry(Hex::new(1, 0)).elevation = Some(99.0);
        let params = Params { erosion_rate: 0.5, deposition_rate: 1.0, ..Params::default() };

        let path = erode_path(&mut store, Hex::new(0, 0), &params);
        assert_eq!(path, vec![Hex::new(0, 0), Hex::new(1, 0)]);
        assert_eq!(store.elevation(Hex::new(0, 0)), Some(50.0));
        // 99 + 50 would overtop the carved source.
        assert_eq!(store.elevation(Hex::new(1, 0)), Some(50.0));
    }

    #[test]
    fn deposition_on_cone_never_builds_a_peak() {
        let mut store = cone(6);
        let params = Params { erosion_rate: 0.6, deposition_rate: 1.0, ..Params::default() };
        let path = erode_path(&mut store, Hex::new(0, 0), &params);
        let [.., pred, terminal] = path[..] else {
            panic!("path too short: {:?}", path);
        };
        assert!(store.elevation(terminal).unwrap() <= store.elevation(pred).unwrap());
    }

    #[test]
    fn dry_run_leaves_store_untouched() {
        let store = cone(4);
        let copy = store.clone();
        descent_path(&store, Hex::new(0, 0));
        assert!(store.iter().zip(copy.iter()).all(|(a, b)| a == b));
    }

    #[test]
    fn erode_is_deterministic() {
        let params = Params { drops: 50, ..Params::default() };
        let mut a = cone(6);
        let mut b = cone(6);
        erode(&mut a, &params, &mut Rng::new(8));
        erode(&mut b, &params, &mut Rng::new(8));
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x == y));
        assert!(a.iter().any(|(_, t)| t.gradient.is_some()));
    }
}
