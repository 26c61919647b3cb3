use std::collections::{BTreeMap, HashMap};

use crate::ir::{Node, NodeId, TierId};

use super::types::{ConflictKind, RoutedPath};

/// Flags nodes sharing a grid cell as `Overlap`, then the first blocker of
/// every blocked route as `Blocker` unless it already overlaps.
pub fn detect_conflicts(nodes: &[Node], paths: &[RoutedPath]) -> BTreeMap<NodeId, ConflictKind> {
    let mut cells: HashMap<(&TierId, u32), Vec<&NodeId>> = HashMap::new();
    for node in nodes {
        cells
            .entry((&node.tier_id, node.column_index))
            .or_default()
            .push(&node.id);
    }

    let mut flags = BTreeMap::new();
    for occupants in cells.values().filter(|ids| ids.len() > 1) {
        for id in occupants {
            flags.insert((*id).clone(), ConflictKind::Overlap);
        }
    }

    for path in paths.iter().filter(|p| p.is_blocked) {
        if let Some(blocker) = &path.blocker {
            flags.entry(blocker.clone()).or_insert(ConflictKind::Blocker);
        }
    }
    flags
}
