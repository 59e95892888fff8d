use crate::erosion::descent_path;
use crate::store::TileStore;

/// One river per watershed along its longest descent path.
///
/// The member with the longest dry-run path (first in store order on ties)
/// wins; every coordinate on that path that isn't a divide becomes river.
/// Returns the number of river coordinates marked.
pub fn trace_rivers(store: &mut TileStore) -> usize {
    let mut marked = 0;
    for (_, members) in store.group_by_watershed() {
        let mut longest: Vec<_> = Vec::new();
        for &h in &members {
            let path = descent_path(store, h);
            if path.len() > longest.len() {
                longest = path;
            }
        }
        for h in longest {
            let t = store.entry(h);
            if !t.is_divide() && !t.is_river() {
                t.river = Some(true);
                marked += 1;
            }
        }
    }
    marked
}
