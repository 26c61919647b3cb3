use std::collections::BTreeSet;

use crate::geometry::segments_intersect;

use super::types::{EdgeKey, RoutedPath};

fn paths_cross(a: &RoutedPath, b: &RoutedPath) -> bool {
    a.points.windows(2).any(|sa| {
        b.points
            .windows(2)
            .any(|sb| segments_intersect(sa[0], sa[1], sb[0], sb[1]))
    })
}

/// Keys of every path that transversally crosses an unrelated path.
///
/// Paths sharing a parent or a child meet at that node and are never
/// compared.
pub fn detect_crossings(paths: &[RoutedPath]) -> BTreeSet<EdgeKey> {
    let mut crossed = BTreeSet::new();
    for (i, a) in paths.iter().enumerate() {
        for b in &paths[i + 1..] {
            if a.parent_id == b.parent_id || a.child_id == b.child_id {
                continue;
            }
            if paths_cross(a, b) {
                crossed.insert(a.key());
                crossed.insert(b.key());
            }
        }
    }
    crossed
}
