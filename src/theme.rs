use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ir::NodeId;
use crate::layout::RoutedPath;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:([0-9a-fA-F]{3})|([0-9a-fA-F]{6})|([0-9a-fA-F]{8}))$").unwrap()
});

/// Colors and weights used to stroke routed edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePalette {
    /// Group-less highlighted edges.
    pub neutral: String,
    /// Edges outside the current selection.
    pub idle: String,
    pub idle_opacity: f32,
    pub idle_width: f32,
    pub highlight_width: f32,
    pub dimmed_opacity: f32,
    pub blocked: String,
    pub blocked_width: f32,
    pub crossed: String,
    pub crossed_opacity: f32,
    pub crossed_dash: String,
}

impl EdgePalette {
    pub fn editor_dark() -> Self {
        Self {
            neutral: "#525252".to_string(),
            idle: "#404040".to_string(),
            idle_opacity: 0.8,
            idle_width: 1.5,
            highlight_width: 2.0,
            dimmed_opacity: 0.1,
            blocked: "#ef4444".to_string(),
            blocked_width: 2.0,
            crossed: "#991b1b".to_string(),
            crossed_opacity: 0.8,
            crossed_dash: "4,4".to_string(),
        }
    }
}

impl Default for EdgePalette {
    fn default() -> Self {
        Self::editor_dark()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStroke {
    pub color: String,
    pub width: f32,
    pub opacity: f32,
    pub dash: String,
}

/// Lower-cased `#rrggbb` or `#rrggbbaa`. Short `#rgb` is expanded.
pub fn normalize_hex_color(input: &str) -> Option<String> {
    let caps = HEX_COLOR_RE.captures(input.trim())?;
    if let Some(short) = caps.get(1) {
        let mut out = String::from("#");
        for ch in short.as_str().chars() {
            out.push(ch);
            out.push(ch);
        }
        return Some(out.to_ascii_lowercase());
    }
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| format!("#{}", m.as_str().to_ascii_lowercase()))
}

/// How a routed path is stroked.
///
/// `highlighted` is the lineage of the current selection, if any. A path is
/// highlighted when both its endpoints belong to it. Blocked paths are drawn
/// as errors regardless of selection, crossed paths as dashed warnings.
pub fn resolve_edge_stroke(
    path: &RoutedPath,
    is_crossed: bool,
    highlighted: Option<&BTreeSet<NodeId>>,
    group_color: Option<&str>,
    palette: &EdgePalette,
) -> EdgeStroke {
    let is_highlighted = highlighted
        .is_some_and(|ids| ids.contains(&path.parent_id) && ids.contains(&path.child_id));

    let mut stroke = if is_highlighted {
        let color = group_color
            .and_then(|c| {
                let normalized = normalize_hex_color(c);
                if normalized.is_none() {
                    log::warn!("ignoring unparsable group color `{c}`");
                }
                normalized
            })
            .unwrap_or_else(|| palette.neutral.clone());
        EdgeStroke {
            color,
            width: palette.highlight_width,
            opacity: 1.0,
            dash: "0".to_string(),
        }
    } else {
        EdgeStroke {
            color: palette.idle.clone(),
            width: palette.idle_width,
            opacity: palette.idle_opacity,
            dash: "0".to_string(),
        }
    };

    if highlighted.is_some() && !is_highlighted {
        stroke.opacity = palette.dimmed_opacity;
    }
    if path.is_blocked {
        stroke.color = palette.blocked.clone();
        stroke.width = palette.blocked_width;
        stroke.opacity = 1.0;
    } else if is_crossed {
        stroke.color = palette.crossed.clone();
        stroke.dash = palette.crossed_dash.clone();
        stroke.opacity = palette.crossed_opacity;
    }
    stroke
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn path(blocked: bool) -> RoutedPath {
        RoutedPath {
            parent_id: NodeId::new("p"),
            child_id: NodeId::new("c"),
            points: Vec::new(),
            is_blocked: blocked,
            color_group_id: None,
            blocker: None,
        }
    }

    fn lineage(ids: &[&str]) -> BTreeSet<NodeId> {
        ids.iter().map(|id| NodeId::new(*id)).collect()
    }

    #[rstest]
    #[case("#4ADE80", Some("#4ade80"))]
    #[case("#fa0", Some("#ffaa00"))]
    #[case(" #11223344 ", Some("#11223344"))]
    #[case("#12345", None)]
    #[case("green", None)]
    #[case("", None)]
    fn hex_colors(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_hex_color(input).as_deref(), expected);
    }

    #[test]
    fn idle_edge_without_selection() {
        let stroke = resolve_edge_stroke(&path(false), false, None, Some("#4ade80"), &EdgePalette::default());
        assert_eq!(stroke.color, "#404040");
        assert_eq!(stroke.opacity, 0.8);
        assert_eq!(stroke.width, 1.5);
        assert_eq!(stroke.dash, "0");
    }

    #[test]
    fn highlighted_edge_takes_group_color() {
        let ids = lineage(&["p", "c"]);
        let palette = EdgePalette::default();
        let stroke = resolve_edge_stroke(&path(false), false, Some(&ids), Some("#4ADE80"), &palette);
        assert_eq!(stroke.color, "#4ade80");
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.opacity, 1.0);

        let stroke = resolve_edge_stroke(&path(false), false, Some(&ids), Some("teal"), &palette);
        assert_eq!(stroke.color, "#525252");
        let stroke = resolve_edge_stroke(&path(false), false, Some(&ids), None, &palette);
        assert_eq!(stroke.color, "#525252");
    }

    #[test]
    fn edges_outside_selection_are_dimmed() {
        let ids = lineage(&["p"]);
        let stroke = resolve_edge_stroke(&path(false), false, Some(&ids), None, &EdgePalette::default());
        assert_eq!(stroke.opacity, 0.1);
        assert_eq!(stroke.color, "#404040");
    }

    #[test]
    fn blocked_beats_crossed_and_dimming() {
        let ids = lineage(&["x"]);
        let stroke = resolve_edge_stroke(&path(true), true, Some(&ids), None, &EdgePalette::default());
        assert_eq!(stroke.color, "#ef4444");
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.opacity, 1.0);
        assert_eq!(stroke.dash, "0");
    }

    #[test]
    fn crossed_edges_are_dashed() {
        let stroke = resolve_edge_stroke(&path(false), true, None, None, &EdgePalette::default());
        assert_eq!(stroke.color, "#991b1b");
        assert_eq!(stroke.dash, "4,4");
        assert_eq!(stroke.opacity, 0.8);
    }
}
