//! Where node rectangles come from.
use std::collections::{BTreeMap, HashMap};

use crate::config::GridConfig;
use crate::geometry::Rect;
use crate::ir::{LayoutOrientation, LayoutState, NodeId, TierId};

/// Looks up the rendered rectangle of a node in viewport space.
///
/// `None` means the node has not been laid out yet. The recompute pass skips
/// such nodes and reports them so the host can schedule another pass.
pub trait NodeRectProvider {
    fn node_rect(&self, id: &NodeId) -> Option<Rect>;
}

impl NodeRectProvider for HashMap<NodeId, Rect> {
    fn node_rect(&self, id: &NodeId) -> Option<Rect> {
        self.get(id).copied()
    }
}

impl NodeRectProvider for BTreeMap<NodeId, Rect> {
    fn node_rect(&self, id: &NodeId) -> Option<Rect> {
        self.get(id).copied()
    }
}

impl<P: NodeRectProvider + ?Sized> NodeRectProvider for &P {
    fn node_rect(&self, id: &NodeId) -> Option<Rect> {
        (**self).node_rect(id)
    }
}

/// Places every node in the middle of its grid cell.
///
/// In vertical orientation tiers are bands stacked top to bottom and columns
/// run left to right after the tier header. Horizontal orientation swaps the
/// axes: tiers are bands left to right and columns run downwards.
#[derive(Debug, Clone)]
pub struct GridRectProvider {
    rects: HashMap<NodeId, Rect>,
}

impl GridRectProvider {
    pub fn new(state: &LayoutState, grid: &GridConfig) -> Self {
        let tiers: HashMap<TierId, usize> = state
            .tier_order()
            .into_iter()
            .enumerate()
            .map(|(idx, id)| (id, idx))
            .collect();

        let mut rects = HashMap::new();
        for node in &state.nodes {
            let Some(&tier_idx) = tiers.get(&node.tier_id) else {
                continue;
            };
            let rect = cell_rect(grid, state.orientation, tier_idx, node.column_index);
            rects.insert(node.id.clone(), rect);
        }
        Self { rects }
    }
}

fn cell_rect(
    grid: &GridConfig,
    orientation: LayoutOrientation,
    tier_idx: usize,
    column: u32,
) -> Rect {
    let tier = tier_idx as f32;
    let column = column as f32;
    match orientation {
        LayoutOrientation::Vertical => {
            let left = grid.header_size
                + grid.canvas_padding
                + column * grid.column_width
                + (grid.column_width - grid.node_width) / 2.0;
            let top = tier * grid.tier_span + (grid.tier_span - grid.node_height) / 2.0;
            Rect::new(left, top, grid.node_width, grid.node_height)
        }
        LayoutOrientation::Horizontal => {
            let left = tier * grid.horizontal_tier_span
                + (grid.horizontal_tier_span - grid.node_width) / 2.0;
            let top = grid.header_size
                + grid.canvas_padding
                + column * grid.row_height
                + (grid.row_height - grid.node_height) / 2.0;
            Rect::new(left, top, grid.node_width, grid.node_height)
        }
    }
}

impl NodeRectProvider for GridRectProvider {
    fn node_rect(&self, id: &NodeId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Node, Tier};

    #[test]
    fn vertical_grid_centres_nodes_in_cells() {
        let state = LayoutState::new(vec![
            Node::new("a", "tier-1", 0),
            Node::new("b", "tier-2", 2),
        ]);
        let grid = GridConfig::default();
        let provider = GridRectProvider::new(&state, &grid);

        let a = provider.node_rect(&NodeId::new("a")).unwrap();
        assert_eq!(a, Rect::new(88.0, 20.0, 144.0, 120.0));

        let b = provider.node_rect(&NodeId::new("b")).unwrap();
        assert_eq!(b.left, 88.0 + 320.0);
        assert_eq!(b.top, 180.0);
    }

    #[test]
    fn horizontal_grid_swaps_axes() {
        let mut state = LayoutState::new(vec![
            Node::new("a", "tier-1", 0),
            Node::new("b", "tier-2", 1),
        ]);
        state.orientation = LayoutOrientation::Horizontal;
        let provider = GridRectProvider::new(&state, &GridConfig::default());

        let a = provider.node_rect(&NodeId::new("a")).unwrap();
        assert_eq!(a, Rect::new(38.0, 110.0, 144.0, 120.0));
        let b = provider.node_rect(&NodeId::new("b")).unwrap();
        assert_eq!(b.left, 258.0);
        assert_eq!(b.top, 290.0);
    }

    #[test]
    fn nodes_outside_tier_list_still_get_a_cell() {
        let mut state = LayoutState::new(vec![
            Node::new("a", "tier-1", 0),
            Node::new("b", "stray", 0),
        ]);
        state.tiers = vec![Tier {
            id: TierId::new("tier-1"),
        }];
        let provider = GridRectProvider::new(&state, &GridConfig::default());
        let b = provider.node_rect(&NodeId::new("b")).unwrap();
        assert_eq!(b.top, 180.0);
    }

    #[test]
    fn map_providers_report_missing_nodes() {
        let mut rects = HashMap::new();
        rects.insert(NodeId::new("a"), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(rects.node_rect(&NodeId::new("a")).is_some());
        assert!(rects.node_rect(&NodeId::new("b")).is_none());
        let by_ref = &rects;
        assert!(by_ref.node_rect(&NodeId::new("a")).is_some());
    }
}
