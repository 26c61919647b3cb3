use crate::error::Result;
use crate::geometry::Point;
use crate::graph;
use crate::ir::{LayoutState, NodeId};
use crate::layout::{ConflictKind, RoutingResult};
use crate::theme::{EdgePalette, EdgeStroke, resolve_edge_stroke};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDump {
    pub routed_paths: Vec<PathDump>,
    pub crossed_edge_ids: Vec<String>,
    pub conflict_flags: BTreeMap<String, ConflictKind>,
    pub unmeasured: Vec<String>,
    pub needs_retry: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDump {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub points: Vec<[f32; 2]>,
    pub is_blocked: bool,
    pub is_crossed: bool,
    pub color_group_id: Option<String>,
    pub stroke: EdgeStroke,
    /// Direction of the arrow head at the child end, in degrees.
    pub arrow_angle: f32,
    /// Where the error dot of a blocked edge sits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_marker: Option<[f32; 2]>,
}

fn arrow_angle(points: &[Point]) -> f32 {
    match points {
        [.., prev, last] => (last.y - prev.y).atan2(last.x - prev.x).to_degrees(),
        _ => 0.0,
    }
}

fn blocked_marker(points: &[Point]) -> Option<[f32; 2]> {
    let first = points.first()?;
    let last = points.last()?;
    Some([(first.x + last.x) / 2.0, (first.y + last.y) / 2.0])
}

impl RoutingDump {
    pub fn from_result(
        result: &RoutingResult,
        state: &LayoutState,
        selection: Option<&NodeId>,
        palette: &EdgePalette,
    ) -> Self {
        let lineage = selection.map(|id| graph::connected_ids(id, &state.nodes));

        let routed_paths = result
            .routed_paths
            .iter()
            .map(|path| {
                let is_crossed = result.is_crossed(path);
                let group_color = path
                    .color_group_id
                    .as_ref()
                    .and_then(|gid| state.group(gid.as_str()))
                    .map(|g| g.color.as_str());
                let stroke =
                    resolve_edge_stroke(path, is_crossed, lineage.as_ref(), group_color, palette);
                PathDump {
                    id: path.key().to_string(),
                    parent_id: path.parent_id.to_string(),
                    child_id: path.child_id.to_string(),
                    points: path.points.iter().map(|p| [p.x, p.y]).collect(),
                    is_blocked: path.is_blocked,
                    is_crossed,
                    color_group_id: path.color_group_id.as_ref().map(|g| g.to_string()),
                    stroke,
                    arrow_angle: arrow_angle(&path.points),
                    blocked_marker: if path.is_blocked {
                        blocked_marker(&path.points)
                    } else {
                        None
                    },
                }
            })
            .collect();

        RoutingDump {
            routed_paths,
            crossed_edge_ids: result.crossed_edge_ids.iter().map(|k| k.to_string()).collect(),
            conflict_flags: result
                .conflict_flags
                .iter()
                .map(|(id, kind)| (id.to_string(), *kind))
                .collect(),
            unmeasured: result.unmeasured.iter().map(|id| id.to_string()).collect(),
            needs_retry: result.needs_remeasure(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

pub fn write_routing_dump(path: &Path, dump: &RoutingDump, pretty: bool) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, dump)?;
    } else {
        serde_json::to_writer(&mut writer, dump)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
