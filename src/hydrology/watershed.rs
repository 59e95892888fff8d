use std::collections::{HashSet, VecDeque};

use crate::erosion::descent_path;
use crate::hex::{Hex, neighbors};
use crate::store::TileStore;

/// A below-sea-level coordinate next to at least one land coordinate.
pub fn is_shoreline(store: &TileStore, h: Hex) -> bool {
    match store.elevation(h) {
        Some(e) if e <= 0.0 => neighbors(h)
            .into_iter()
            .any(|n| store.elevation(n).is_some_and(|ne| ne > 0.0)),
        _ => false,
    }
}

/// Group land coordinates by the terminus of their descent path.
///
/// A path whose terminus already carries an id joins that watershed; otherwise
/// the next id is allocated. Every coordinate on the path takes the id. When
/// the terminus is at sea level, the connected shoreline around it is flooded
/// with the same id. Returns the number of ids allocated.
pub fn assign_watersheds(store: &mut TileStore) -> u32 {
    for (_, t) in store.iter_mut() {
        t.shoreline = None;
        t.watershed = None;
    }

    let starts: Vec<Hex> = store
        .iter()
        .filter(|(_, t)| t.is_land())
        .map(|(h, _)| h)
        .collect();

    let mut next_id = 0u32;
    for start in starts {
        if store.watershed(start).is_some() {
            continue;
        }
        let path = descent_path(store, start);
        let Some(&end) = path.last() else {
            continue;
        };

        let id = match store.watershed(end) {
            Some(id) => id,
            None => {
                next_id += 1;
                next_id - 1
            }
        };
        for &h in &path {
            store.entry(h).watershed = Some(id);
        }

        let at_sea = store.elevation(end).is_some_and(|e| e <= 0.0);
        if at_sea && !store.get(end).is_some_and(|t| t.is_shoreline()) {
            flood_shoreline(store, end, id);
        }
    }
    next_id
}

/// Breadth-first over shoreline coordinates reachable from `start`.
fn flood_shoreline(store: &mut TileStore, start: Hex, id: u32) {
    let mut queue = VecDeque::from([start]);
    let mut seen = HashSet::from([start]);
    while let Some(h) = queue.pop_front() {
        let t = store.entry(h);
        t.shoreline = Some(true);
        t.watershed = Some(id);
        for n in neighbors(h) {
            if !seen.contains(&n) && is_shoreline(store, n) {
                seen.insert(n);
                queue.push_back(n);
            }
        }
    }
}
