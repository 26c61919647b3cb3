use std::collections::HashMap;

use crate::geometry::Rect;
use crate::ir::{Node, NodeId, Viewport};
use crate::measure::NodeRectProvider;

/// Node rectangles in container space, in node-list order.
///
/// Iteration order matters: the router reports the first obstacle it hits.
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    entries: Vec<(NodeId, Rect)>,
    index: HashMap<NodeId, usize>,
}

impl ObstacleMap {
    pub fn get(&self, id: &NodeId) -> Option<&Rect> {
        self.index.get(id).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Rect)> {
        self.entries.iter().map(|(id, rect)| (id, rect))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, id: NodeId, rect: Rect) {
        if let Some(&idx) = self.index.get(&id) {
            self.entries[idx].1 = rect;
            return;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, rect));
    }
}

impl FromIterator<(NodeId, Rect)> for ObstacleMap {
    fn from_iter<T: IntoIterator<Item = (NodeId, Rect)>>(iter: T) -> Self {
        let mut map = ObstacleMap::default();
        for (id, rect) in iter {
            map.insert(id, rect);
        }
        map
    }
}

/// Translates measured rectangles from viewport space into the scroll
/// container's content space.
///
/// Returns the map together with the ids of nodes that could not be measured.
pub fn build_obstacles<P: NodeRectProvider + ?Sized>(
    nodes: &[Node],
    rects: &P,
    viewport: &Viewport,
) -> (ObstacleMap, Vec<NodeId>) {
    let dx = viewport.scroll_left - viewport.container.left;
    let dy = viewport.scroll_top - viewport.container.top;

    let mut map = ObstacleMap::default();
    let mut unmeasured = Vec::new();
    for node in nodes {
        match rects.node_rect(&node.id) {
            Some(raw) if raw.is_finite() => map.insert(node.id.clone(), raw.translate(dx, dy)),
            _ => unmeasured.push(node.id.clone()),
        }
    }
    (map, unmeasured)
}
