mod conflicts;
mod crossings;
mod obstacles;
mod ports;
mod routing;
pub(crate) mod types;
pub use conflicts::detect_conflicts;
pub use crossings::detect_crossings;
pub use obstacles::{ObstacleMap, build_obstacles};
pub use ports::{EdgeEnds, anchor_point, assign_ports, port_offset, select_sides};
pub use routing::route_connection;
pub use types::*;

use std::collections::HashMap;

use crate::config::RoutingConfig;
use crate::graph;
use crate::ir::{GroupId, LayoutState, NodeId};
use crate::measure::NodeRectProvider;

/// Runs one full routing pass over `state`.
///
/// Nodes without a rectangle are left out and listed in
/// [`RoutingResult::unmeasured`]. Edges touching the dragged node are
/// suppressed. The pass never fails; an edge that cannot be routed cleanly is
/// returned flagged as blocked.
pub fn recompute<P: NodeRectProvider + ?Sized>(
    state: &LayoutState,
    rects: &P,
    config: &RoutingConfig,
) -> RoutingResult {
    let (obstacles, unmeasured) = build_obstacles(&state.nodes, rects, &state.viewport);
    let groups: HashMap<&NodeId, Option<&GroupId>> = state
        .nodes
        .iter()
        .map(|n| (&n.id, n.group_id.as_ref()))
        .collect();

    let mut ends = Vec::new();
    for key in graph::edges(&state.nodes) {
        if state.drag.suppresses(&key.parent_id) || state.drag.suppresses(&key.child_id) {
            continue;
        }
        let (Some(parent), Some(child)) = (obstacles.get(&key.parent_id), obstacles.get(&key.child_id))
        else {
            continue;
        };
        let color_group_id = groups.get(&key.parent_id).copied().flatten().cloned();
        ends.push(EdgeEnds {
            parent: *parent,
            child: *child,
            color_group_id,
            key,
        });
    }

    let connections = assign_ports(&ends, state.orientation, config);
    let routed_paths: Vec<RoutedPath> = connections
        .into_iter()
        .map(|conn| {
            let route = route_connection(&conn, &obstacles, config);
            if route.is_blocked {
                log::trace!(
                    "edge {} blocked by {}",
                    conn.key,
                    route.blocker.as_ref().map(NodeId::as_str).unwrap_or("?")
                );
            }
            RoutedPath {
                parent_id: conn.key.parent_id,
                child_id: conn.key.child_id,
                points: route.points,
                is_blocked: route.is_blocked,
                color_group_id: conn.color_group_id,
                blocker: route.blocker,
            }
        })
        .collect();

    let crossed_edge_ids = detect_crossings(&routed_paths);
    let conflict_flags = detect_conflicts(&state.nodes, &routed_paths);

    let result = RoutingResult {
        routed_paths,
        crossed_edge_ids,
        conflict_flags,
        unmeasured,
    };
    log::debug!(
        "routing pass: {} edges, {} blocked, {} crossed, {} unmeasured",
        result.routed_paths.len(),
        result.blocked_count(),
        result.crossed_edge_ids.len(),
        result.unmeasured.len()
    );
    result
}
