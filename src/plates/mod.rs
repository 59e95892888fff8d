pub mod grow;
pub mod seed;

use std::collections::VecDeque;

use crate::config::Params;
use crate::hex::Hex;
use crate::rng::Rng;
use crate::store::TileStore;

/// A plate lives only while growth runs; the store keeps the result.
#[derive(Debug)]
pub struct Plate {
    pub index: u32,
    pub elevation: f64,
    pub frontier: VecDeque<Hex>,
    pub claimed: Vec<Hex>,
}

/// Seed plates, grow them until the bounds are covered, then assign colors.
/// Returns the number of plates that were seeded.
pub fn simulate_plates(store: &mut TileStore, params: &Params, rng: &mut Rng) -> usize {
    let mut plates = seed::seed_plates(store, params, rng);
    grow::grow_plates(store, &mut plates, params, rng);
    grow::assign_colors(store, params.colors);
    for p in &plates {
        log::debug!("plate {} elevation {:.0} claimed {}", p.index, p.elevation, p.claimed.len());
    }
    plates.len()
}
