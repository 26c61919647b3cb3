use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::RoutingConfig;
use crate::geometry::{Point, Rect};
use crate::ir::{GroupId, LayoutOrientation, NodeId};

use super::types::{Connection, EdgeKey, Orientation, Side};

/// An edge whose two endpoints were both measured this pass.
#[derive(Debug, Clone)]
pub struct EdgeEnds {
    pub key: EdgeKey,
    pub parent: Rect,
    pub child: Rect,
    pub color_group_id: Option<GroupId>,
}

/// Picks the exit side on the parent and the entry side on the child.
///
/// Edges run across tiers when the gap along the tier axis exceeds `margin`.
/// Otherwise they run alongside the tier and leave towards the child.
pub fn select_sides(
    parent: &Rect,
    child: &Rect,
    layout: LayoutOrientation,
    margin: f32,
) -> (Orientation, Side, Side) {
    match layout {
        LayoutOrientation::Vertical => {
            if child.top - parent.bottom() > margin {
                (Orientation::Vertical, Side::Bottom, Side::Top)
            } else if parent.top - child.bottom() > margin {
                (Orientation::Vertical, Side::Top, Side::Bottom)
            } else if child.left > parent.right() {
                (Orientation::Horizontal, Side::Right, Side::Left)
            } else {
                (Orientation::Horizontal, Side::Left, Side::Right)
            }
        }
        LayoutOrientation::Horizontal => {
            if child.left - parent.right() > margin {
                (Orientation::Horizontal, Side::Right, Side::Left)
            } else if parent.left - child.right() > margin {
                (Orientation::Horizontal, Side::Left, Side::Right)
            } else if child.top > parent.bottom() {
                (Orientation::Vertical, Side::Bottom, Side::Top)
            } else {
                (Orientation::Vertical, Side::Top, Side::Bottom)
            }
        }
    }
}

/// Offset of the `index`-th of `len` edges sharing a port, centred on zero.
pub fn port_offset(index: usize, len: usize, step: f32) -> f32 {
    (index as f32 - (len as f32 - 1.0) / 2.0) * step
}

/// Attachment point on `side` of `rect`, shifted by `offset` along the side.
pub fn anchor_point(rect: &Rect, side: Side, offset: f32) -> Point {
    match side {
        Side::Bottom => Point::new(rect.center_x() + offset, rect.bottom()),
        Side::Top => Point::new(rect.center_x() + offset, rect.top),
        Side::Right => Point::new(rect.right(), rect.center_y() + offset),
        Side::Left => Point::new(rect.left, rect.center_y() + offset),
    }
}

/// Position of the partner node along a port's side.
fn partner_position(partner: &Rect, side: Side) -> f32 {
    if side.is_vertical() {
        partner.center_x()
    } else {
        partner.center_y()
    }
}

fn fan_out(
    groups: HashMap<(NodeId, Side), Vec<usize>>,
    partner: impl Fn(usize) -> (f32, NodeId),
    step: f32,
    offsets: &mut [f32],
) {
    for mut members in groups.into_values() {
        members.sort_by(|&a, &b| {
            let (pos_a, id_a) = partner(a);
            let (pos_b, id_b) = partner(b);
            pos_a
                .partial_cmp(&pos_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| id_a.cmp(&id_b))
        });
        let len = members.len();
        for (idx, edge) in members.into_iter().enumerate() {
            offsets[edge] = port_offset(idx, len, step);
        }
    }
}

/// Resolves sides, groups edges by port and spreads each group along its side.
///
/// Parent ports and child ports are grouped independently. Within a port the
/// order follows the partner's centre, so fanned edges leave without crossing.
pub fn assign_ports(
    edges: &[EdgeEnds],
    layout: LayoutOrientation,
    config: &RoutingConfig,
) -> Vec<Connection> {
    let sides: Vec<(Orientation, Side, Side)> = edges
        .iter()
        .map(|e| select_sides(&e.parent, &e.child, layout, config.side_margin))
        .collect();

    let mut parent_ports: HashMap<(NodeId, Side), Vec<usize>> = HashMap::new();
    let mut child_ports: HashMap<(NodeId, Side), Vec<usize>> = HashMap::new();
    for (idx, (edge, &(_, start_side, end_side))) in edges.iter().zip(&sides).enumerate() {
        parent_ports
            .entry((edge.key.parent_id.clone(), start_side))
            .or_default()
            .push(idx);
        child_ports
            .entry((edge.key.child_id.clone(), end_side))
            .or_default()
            .push(idx);
    }

    let mut start_offsets = vec![0.0; edges.len()];
    let mut end_offsets = vec![0.0; edges.len()];
    fan_out(
        parent_ports,
        |idx| {
            let edge = &edges[idx];
            (
                partner_position(&edge.child, sides[idx].1),
                edge.key.child_id.clone(),
            )
        },
        config.port_step,
        &mut start_offsets,
    );
    fan_out(
        child_ports,
        |idx| {
            let edge = &edges[idx];
            (
                partner_position(&edge.parent, sides[idx].2),
                edge.key.parent_id.clone(),
            )
        },
        config.port_step,
        &mut end_offsets,
    );

    edges
        .iter()
        .enumerate()
        .map(|(idx, edge)| {
            let (orientation, start_side, end_side) = sides[idx];
            Connection {
                key: edge.key.clone(),
                orientation,
                start_side,
                end_side,
                start_offset: start_offsets[idx],
                end_offset: end_offsets[idx],
                start: anchor_point(&edge.parent, start_side, start_offsets[idx]),
                end: anchor_point(&edge.child, end_side, end_offsets[idx]),
                color_group_id: edge.color_group_id.clone(),
            }
        })
        .collect()
}
