//! Input model handed over by the host editor.
//!
//! Nodes carry grid coordinates and parent links only. Pixel rectangles are
//! resolved separately through [`crate::measure::NodeRectProvider`].
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Rect;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(NodeId);
string_id!(TierId);
string_id!(GroupId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub tier_id: TierId,
    pub column_index: u32,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub parent_ids: Vec<NodeId>,
}

impl Node {
    pub fn new(id: impl Into<String>, tier_id: impl Into<String>, column_index: u32) -> Self {
        Self {
            id: NodeId::new(id),
            tier_id: TierId::new(tier_id),
            column_index,
            group_id: None,
            parent_ids: Vec::new(),
        }
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(GroupId::new(group_id));
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_ids.push(NodeId::new(parent_id));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub color: String,
}

impl Group {
    pub fn new(id: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(id),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
}

/// Which screen axis the tiers are stacked along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutOrientation {
    /// Tiers are rows, stacked top to bottom.
    #[default]
    Vertical,
    /// Tiers are columns, stacked left to right.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub is_dragging: bool,
    #[serde(default)]
    pub dragged_node_id: Option<NodeId>,
}

impl DragState {
    pub fn dragging(node_id: impl Into<String>) -> Self {
        Self {
            is_dragging: true,
            dragged_node_id: Some(NodeId::new(node_id)),
        }
    }

    /// Edges touching the dragged node stay out of routing until drop.
    pub fn suppresses(&self, node_id: &NodeId) -> bool {
        self.is_dragging && self.dragged_node_id.as_ref() == Some(node_id)
    }
}

/// Scroll container geometry. Node rectangles are reported in viewport
/// space and routed in container space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub container: Rect,
    #[serde(default)]
    pub scroll_left: f32,
    #[serde(default)]
    pub scroll_top: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub drag: DragState,
    #[serde(default)]
    pub orientation: LayoutOrientation,
}

impl LayoutState {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id.as_str() == id)
    }

    /// Tier ids in rank order: the host's tier list first, then any tier a
    /// node references that the list is missing, in order of first appearance.
    pub fn tier_order(&self) -> Vec<TierId> {
        let mut seen = HashSet::new();
        self.tiers
            .iter()
            .map(|t| &t.id)
            .chain(self.nodes.iter().map(|n| &n.tier_id))
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }
}

/// One serialized frame of host state, optionally with measured rectangles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: LayoutState,
    #[serde(default)]
    pub rects: Option<BTreeMap<NodeId, Rect>>,
}

impl Snapshot {
    pub fn from_json(input: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(input)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for node in &self.state.nodes {
            if node.id.as_str().is_empty() {
                return Err(Error::InvalidSnapshot("node with empty id".to_string()));
            }
            if !ids.insert(node.id.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate node id `{}`",
                    node.id
                )));
            }
        }
        for node in &self.state.nodes {
            for parent in &node.parent_ids {
                if !ids.contains(parent.as_str()) {
                    log::warn!("node `{}` lists unknown parent `{}`", node.id, parent);
                }
            }
        }
        if let Some(rects) = &self.rects {
            for (id, rect) in rects {
                if !rect.is_finite() {
                    return Err(Error::InvalidSnapshot(format!(
                        "rectangle for `{id}` is not finite"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_snapshot() {
        let json = r##"{
            "state": {
                "nodes": [
                    { "id": "t1", "tierId": "tier-1", "columnIndex": 2, "groupId": "g_lt" },
                    { "id": "t2", "tierId": "tier-2", "columnIndex": 2, "groupId": "g_lt", "parentIds": ["t1"] }
                ],
                "groups": [{ "id": "g_lt", "color": "#4ade80" }],
                "drag": { "isDragging": true, "draggedNodeId": "t2" },
                "orientation": "horizontal"
            },
            "rects": { "t1": { "left": 0, "top": 0, "width": 144, "height": 120 } }
        }"##;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.state.nodes.len(), 2);
        assert_eq!(snapshot.state.nodes[1].parent_ids, vec![NodeId::new("t1")]);
        assert_eq!(snapshot.state.orientation, LayoutOrientation::Horizontal);
        assert!(snapshot.state.drag.suppresses(&NodeId::new("t2")));
        assert!(!snapshot.state.drag.suppresses(&NodeId::new("t1")));
        let rects = snapshot.rects.unwrap();
        assert_eq!(rects["t1"].width, 144.0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{ "state": { "nodes": [
            { "id": "a", "tierId": "t", "columnIndex": 0 },
            { "id": "a", "tierId": "t", "columnIndex": 1 }
        ] } }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn rejects_empty_id() {
        let json = r#"{ "state": { "nodes": [ { "id": "", "tierId": "t", "columnIndex": 0 } ] } }"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = Snapshot::from_json("{ nope").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn tier_order_falls_back_to_first_appearance() {
        let state = LayoutState::new(vec![
            Node::new("a", "tier-2", 0),
            Node::new("b", "tier-1", 0),
            Node::new("c", "tier-2", 1),
        ]);
        assert_eq!(
            state.tier_order(),
            vec![TierId::new("tier-2"), TierId::new("tier-1")]
        );

        let mut state = state;
        state.tiers = vec![
            Tier {
                id: TierId::new("tier-1"),
            },
            Tier {
                id: TierId::new("tier-2"),
            },
        ];
        assert_eq!(state.tier_order()[0], TierId::new("tier-1"));
    }

    #[test]
    fn tier_order_appends_tiers_missing_from_host_list() {
        let mut state = LayoutState::new(vec![
            Node::new("a", "tier-1", 0),
            Node::new("b", "tier-9", 0),
            Node::new("c", "tier-1", 1),
        ]);
        state.tiers = vec![
            Tier {
                id: TierId::new("tier-2"),
            },
            Tier {
                id: TierId::new("tier-1"),
            },
        ];
        assert_eq!(
            state.tier_order(),
            vec![
                TierId::new("tier-2"),
                TierId::new("tier-1"),
                TierId::new("tier-9"),
            ]
        );
    }

    #[test]
    fn idle_drag_suppresses_nothing() {
        let drag = DragState {
            is_dragging: false,
            dragged_node_id: Some(NodeId::new("a")),
        };
        assert!(!drag.suppresses(&NodeId::new("a")));
    }
}
