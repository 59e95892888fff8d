use crate::config::Params;
use crate::hex::{DIRECTIONS, permuted_directions};
use crate::rng::Rng;
use crate::store::TileStore;

use super::Plate;

/// Round-robin multi-source flood fill.
///
/// Each round every plate pops one frontier coordinate. A coordinate that
/// already carries a plate id is skipped, so the first plate to reach it wins.
/// Stops after a round in which no plate had anything to pop.
pub fn grow_plates(store: &mut TileStore, plates: &mut [Plate], params: &Params, rng: &mut Rng) {
    let bounds = params.bounds;
    let mut progress = true;
    while progress {
        progress = false;
        for plate in plates.iter_mut() {
            let Some(cur) = plate.frontier.pop_front() else {
                continue;
            };
            progress = true;

            let rec = store.entry(cur);
            if rec.plate.is_some() {
                continue;
            }
            rec.plate = Some(plate.index);
            rec.elevation = Some(plate.elevation);
            plate.claimed.push(cur);

            let dirs = if params.shuffle_growth {
                permuted_directions(rng)
            } else {
                DIRECTIONS
            };
            for d in dirs {
                let n = cur + d;
                if !bounds.contains(n) {
                    continue;
                }
                if store.get(n).is_some_and(|t| t.plate.is_some()) {
                    continue;
                }
                plate.frontier.push_back(n);
            }
        }
    }
}

/// Visual grouping: `color = plate mod colors`.
pub fn assign_colors(store: &mut TileStore, colors: u32) {
    for (_, t) in store.iter_mut() {
        if let Some(p) = t.plate {
            t.color = Some(p % colors.max(1));
        }
    }
}
