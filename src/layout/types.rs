use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::ir::{GroupId, LayoutOrientation, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Whether an edge leaving this side starts out vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Axis along which an edge mainly travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl From<LayoutOrientation> for Orientation {
    fn from(value: LayoutOrientation) -> Self {
        match value {
            LayoutOrientation::Vertical => Orientation::Vertical,
            LayoutOrientation::Horizontal => Orientation::Horizontal,
        }
    }
}

/// Identity of a derived parent to child edge. Renders as `parent-child`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub parent_id: NodeId,
    pub child_id: NodeId,
}

impl EdgeKey {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: NodeId::new(parent_id),
            child_id: NodeId::new(child_id),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parent_id, self.child_id)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An edge after side selection and port offsetting, ready for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub key: EdgeKey,
    pub orientation: Orientation,
    pub start_side: Side,
    pub end_side: Side,
    pub start_offset: f32,
    pub end_offset: f32,
    pub start: Point,
    pub end: Point,
    pub color_group_id: Option<GroupId>,
}

/// Router output for a single edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub points: Vec<Point>,
    pub is_blocked: bool,
    /// First obstacle hit by the preferred candidate, if any candidate was hit.
    pub blocker: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedPath {
    pub parent_id: NodeId,
    pub child_id: NodeId,
    pub points: Vec<Point>,
    pub is_blocked: bool,
    pub color_group_id: Option<GroupId>,
    #[serde(skip)]
    pub blocker: Option<NodeId>,
}

impl RoutedPath {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            parent_id: self.parent_id.clone(),
            child_id: self.child_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Overlap,
    Blocker,
}

/// Everything one recompute pass produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingResult {
    pub routed_paths: Vec<RoutedPath>,
    pub crossed_edge_ids: BTreeSet<EdgeKey>,
    pub conflict_flags: BTreeMap<NodeId, ConflictKind>,
    /// Nodes that had no rectangle this pass.
    pub unmeasured: Vec<NodeId>,
}

impl RoutingResult {
    pub fn needs_remeasure(&self) -> bool {
        !self.unmeasured.is_empty()
    }

    pub fn is_crossed(&self, path: &RoutedPath) -> bool {
        self.crossed_edge_ids.contains(&path.key())
    }

    pub fn blocked_count(&self) -> usize {
        self.routed_paths.iter().filter(|p| p.is_blocked).count()
    }
}
