use crate::hex::{FLOW_COEFFS, neighbors};
use crate::store::TileStore;

/// One smoothing pass: each elevation becomes the mean of itself and its
/// neighbors that have an elevation. Results are buffered and committed after
/// the whole pass so the output doesn't depend on iteration order.
pub fn smooth(store: &mut TileStore) {
    let next: Vec<Option<f64>> = store
        .iter()
        .map(|(h, t)| {
            let e = t.elevation?;
            let mut total = e;
            let mut count = 1.0;
            for n in neighbors(h) {
                if let Some(ne) = store.elevation(n) {
                    total += ne;
                    count += 1.0;
                }
            }
            Some(total / count)
        })
        .collect();

    for ((_, t), e) in store.iter_mut().zip(next) {
        if e.is_some() {
            t.elevation = e;
        }
    }
}

pub fn smooth_passes(store: &mut TileStore, passes: usize) {
    for _ in 0..passes {
        smooth(store);
    }
}

/// Flow-direction field for land coordinates.
///
/// Sums elevation drops to each neighbor weighted by that direction's unit
/// vector, then divides every vector by the largest magnitude seen.
pub fn compute_gradient(store: &mut TileStore) {
    let grads: Vec<Option<[f64; 2]>> = store
        .iter()
        .map(|(h, t)| {
            let e = t.elevation.filter(|&e| e > 0.0)?;
            let mut g = [0.0f64; 2];
            for (i, n) in neighbors(h).into_iter().enumerate() {
                if let Some(ne) = store.elevation(n) {
                    g[0] += (e - ne) * FLOW_COEFFS[i][0];
                    g[1] += (e - ne) * FLOW_COEFFS[i][1];
                }
            }
            Some(g)
        })
        .collect();

    let max_mag = grads
        .iter()
        .flatten()
        .map(|g| g[0].hypot(g[1]))
        .fold(0.0f64, f64::max);

    for ((_, t), g) in store.iter_mut().zip(grads) {
        t.gradient = g.map(|g| {
            if max_mag > 0.0 {
                [g[0] / max_mag, g[1] / max_mag]
            } else {
                g
            }
        });
    }
}
