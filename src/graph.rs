//! Edges are never stored. They are read off the parent lists every pass.
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::ir::{Node, NodeId};
use crate::layout::EdgeKey;

/// Parent to child edges in node-list order, then parent-list order.
///
/// Self-loops, repeated parent ids and parents missing from `nodes` are
/// dropped.
pub fn edges(nodes: &[Node]) -> Vec<EdgeKey> {
    let known: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
    let mut out = Vec::new();
    for child in nodes {
        let mut seen = HashSet::new();
        for parent_id in &child.parent_ids {
            if parent_id == &child.id || !known.contains(parent_id) {
                continue;
            }
            if !seen.insert(parent_id) {
                continue;
            }
            out.push(EdgeKey {
                parent_id: parent_id.clone(),
                child_id: child.id.clone(),
            });
        }
    }
    out
}

/// `start` together with every transitive ancestor and descendant.
pub fn connected_ids(start: &NodeId, nodes: &[Node]) -> BTreeSet<NodeId> {
    let by_id: HashMap<&NodeId, &Node> = nodes.iter().map(|n| (&n.id, n)).collect();
    let mut connected = BTreeSet::new();
    connected.insert(start.clone());

    let mut stack = vec![start.clone()];
    while let Some(current) = stack.pop() {
        let Some(node) = by_id.get(&current) else {
            continue;
        };
        for parent_id in &node.parent_ids {
            if connected.insert(parent_id.clone()) {
                stack.push(parent_id.clone());
            }
        }
    }

    let mut stack = vec![start.clone()];
    while let Some(current) = stack.pop() {
        for node in nodes {
            if node.parent_ids.contains(&current) && connected.insert(node.id.clone()) {
                stack.push(node.id.clone());
            }
        }
    }
    connected
}
