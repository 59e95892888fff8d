use std::collections::VecDeque;

use crate::config::Params;
use crate::rng::Rng;
use crate::store::TileStore;

use super::Plate;

/// Pick up to `params.plates` distinct in-bounds seed coordinates and draw
/// each plate's base elevation.
///
/// Continental plates get elevation in (0, max]; oceanic plates in [-max, 0).
/// Draw order per plate is fixed: one draw for the ocean test, one for magnitude.
pub fn seed_plates(store: &mut TileStore, params: &Params, rng: &mut Rng) -> Vec<Plate> {
    let mut coords = params.bounds.coords();
    rng.shuffle(&mut coords);

    let max = params.max_elevation;
    let mut plates = Vec::with_capacity(params.plates.min(coords.len()));
    for (i, &h) in coords.iter().take(params.plates).enumerate() {
        store.entry(h).seed = Some(true);
        let elevation = if rng.next_f64() >= params.ocean {
            max * (1.0 - rng.next_f64())
        } else {
            -max * (1.0 - rng.next_f64())
        };
        plates.push(Plate {
            index: i as u32,
            elevation,
            frontier: VecDeque::from([h]),
            claimed: Vec::new(),
        });
    }
    plates
}
