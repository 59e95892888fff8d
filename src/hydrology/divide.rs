use std::collections::HashSet;

use crate::hex::{Hex, neighbors};
use crate::store::TileStore;

/// Mark `divide` on every watershed member that touches a different watershed.
///
/// Each watershed is walked depth-first through same-id neighbors, restarting
/// from any member the walk didn't reach. Returns the number of divides.
pub fn mark_divides(store: &mut TileStore) -> usize {
    let mut count = 0;
    for (id, members) in store.group_by_watershed() {
        let mut seen: HashSet<Hex> = HashSet::with_capacity(members.len());
        for &root in &members {
            if !seen.insert(root) {
                continue;
            }
            let mut stack = vec![root];
            while let Some(h) = stack.pop() {
                let mut boundary = false;
                for n in neighbors(h) {
                    match store.watershed(n) {
                        Some(w) if w == id => {
                            if seen.insert(n) {
                                stack.push(n);
                            }
                        }
                        Some(_) => boundary = true,
                        None => {}
                    }
                }
                if boundary {
                    store.entry(h).divide = Some(true);
                    count += 1;
                }
            }
        }
    }
    count
}
